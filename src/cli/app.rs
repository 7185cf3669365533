use super::commands::{PagesCommands, WatchCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlops-dashboard")]
#[command(about = "Operations dashboard for a distributed SQL query cluster")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live dashboard (default)
    Watch(WatchCommands),
    /// List every registered page path
    Pages(PagesCommands),
}
