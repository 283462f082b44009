mod cli;
mod config;
mod tui;

use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Command, ConfigCommand};

/// Entry point wiring the CLI to the TUI.
fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    init_tracing(&config.log_filter);

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => tui::launch(&config.ui)?,
        Command::Version => print_version(),
        Command::Config(ConfigCommand::Init) => init_config(cli.config.as_deref())?,
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    // RUST_LOG wins; otherwise the configured filter. Logs go to stderr so
    // they stay out of the rendered frames on stdout.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("todo {}", env!("CARGO_PKG_VERSION"));
}

fn init_config(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::default_path()?,
    };
    let path = config::write_if_missing(&config::Config::default(), &path)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
