use anyhow::Result;
use clap::Parser;
use log::info;

use sqlops_dashboard::cli::commands::{WatchCommands, pages_command, watch_command};
use sqlops_dashboard::cli::{Cli, Commands};
use sqlops_dashboard::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Log to a file (truncated on each run) so records never interleave with painted frames
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("sqlops-dashboard.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    info!("Starting sqlops-dashboard");

    match cli.command {
        Some(Commands::Pages(_)) => pages_command(&config),
        Some(Commands::Watch(args)) => watch_command(config, args).await,
        None => watch_command(config, WatchCommands::default()).await,
    }
}
