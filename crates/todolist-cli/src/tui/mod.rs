mod app;
mod view;

use std::{io, time::Duration};

use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::config::UiConfig;
use app::App;

/// Run the interactive list until the user quits. Redraws only when the
/// store or the view state reports a change.
pub fn launch(ui: &UiConfig) -> Result<()> {
    let tick = Duration::from_millis(ui.tick_rate_ms.max(1));
    let mut app = App::new(ui.clone());

    // Guard restores the terminal even if we early-return.
    let guard = TerminalGuard::enter()?;
    let mut terminal = guard.terminal()?;
    info!("tui started");

    loop {
        if app.take_dirty() {
            terminal.draw(|frame| view::draw(frame, &app))?;
        }

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !app.handle_key(key) {
                    break;
                }
            }
            Event::Resize(_, _) => app.mark_dirty(),
            _ => {}
        }
    }

    info!(tasks = app.list().len(), "tui exited");
    Ok(())
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors here cannot be propagated; report and carry on.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}
