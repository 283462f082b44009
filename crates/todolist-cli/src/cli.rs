use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition. The list itself lives in the TUI.
#[derive(Parser, Debug)]
#[command(
    name = "todo",
    about = "A single-screen to-do list for the terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Load configuration from this file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive list (press Esc to exit).
    Tui,
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
