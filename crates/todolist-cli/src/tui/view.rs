use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use todolist_core::Task;
use unicode_width::UnicodeWidthChar;

use super::app::{App, Focus};

/// Render the whole screen from the current app state.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(Span::styled(
        app.ui.title.as_str(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(header, chunks[0]);

    draw_input(frame, app, chunks[1]);

    if let Some(message) = app.list().pending_hint().message() {
        let hint = Paragraph::new(Span::styled(message, Style::default().fg(Color::Red)));
        frame.render_widget(hint, chunks[2]);
    }

    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    let active = app.list().active_items();
    draw_list(
        frame,
        lists[0],
        &format!("Active ({})", active.len()),
        &active,
        app.active_selected(),
        app.focus() == Focus::Active,
    );
    let completed = app.list().completed_items();
    draw_list(
        frame,
        lists[1],
        &format!("Completed ({})", completed.len()),
        &completed,
        app.completed_selected(),
        app.focus() == Focus::Completed,
    );

    let footer = Paragraph::new(Line::from(controls(app.focus())))
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(footer, chunks[4]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let pending = app.list().pending_text();
    let focused = app.focus() == Focus::Input;

    let add_style = if app.list().can_submit() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    // One column stays free for the cursor after the last character.
    let room = usize::from(area.width.saturating_sub(3));
    let (shown, shown_width) = visible_tail(pending, room);

    let text = if pending.is_empty() {
        Span::styled(
            app.ui.placeholder.as_str(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(shown)
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title("New task")
            .title(Line::from(Span::styled("[+ Add]", add_style)).right_aligned()),
    );
    frame.render_widget(input, area);

    if focused {
        let width = u16::try_from(shown_width).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

/// Longest suffix of `text` that fits in `max` terminal columns, with its width.
fn visible_tail(text: &str, max: usize) -> (&str, usize) {
    let mut width = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        start = idx;
    }
    (&text[start..], width)
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    tasks: &[&Task],
    selected: Option<usize>,
    focused: bool,
) {
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|t| {
            let (mark, style) = if t.completed {
                (
                    "[x]",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ]", Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(Color::Green)),
                Span::raw(" "),
                Span::styled(t.text.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(title.to_string()),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused {
        state.select(selected);
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn controls(focus: Focus) -> Vec<Span<'static>> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    match focus {
        Focus::Input => vec![
            key("Enter"),
            Span::raw(" add  "),
            key("Tab"),
            Span::raw(" lists  "),
            key("Esc"),
            Span::raw(" quit"),
        ],
        Focus::Active | Focus::Completed => vec![
            key("Space"),
            Span::raw(" toggle  "),
            key("d"),
            Span::raw(" delete  "),
            key("Tab"),
            Span::raw(" next  "),
            key("q"),
            Span::raw(" quit"),
        ],
    }
}
