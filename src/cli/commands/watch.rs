use anyhow::{Context, Result};
use clap::Args;
use log::{info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::api::{ApiClient, NetworkDispatcher};
use crate::cli::input::{InputCommand, USAGE};
use crate::cli::painter::Painter;
use crate::config::Config;
use crate::dashboard::pages::catalog;
use crate::dashboard::{AppPath, Dispatcher, Host, wall_clock_secs};

#[derive(Args, Default)]
pub struct WatchCommands {
    /// Page to open first, as category:name or page=category:name
    #[arg(long)]
    pub page: Option<AppPath>,

    /// Base URL of the cluster's REST endpoint
    #[arg(long)]
    pub url: Option<String>,

    /// Tick period in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn watch_command(mut config: Config, args: WatchCommands) -> Result<()> {
    config.override_base_url(args.url);
    if let Some(tick_ms) = args.tick_ms {
        config.tick_millis = tick_ms;
    }

    let client = ApiClient::new(&config.base_url, config.request_timeout())?;
    let (dispatcher, mut completions) = NetworkDispatcher::new(Arc::new(client));
    let registry = catalog(&config).context("Failed to build page catalog")?;
    let mut host = Host::new(registry, dispatcher);

    let deep_link = match args.page {
        Some(page) => Some(page),
        None => config.default_page()?,
    };
    let start = host.boot(deep_link.as_ref()).context("Failed to open the start page")?;
    info!("Dashboard started on {} against {}", start, config.base_url);
    println!("Watching {} ({})", config.base_url, USAGE);

    let mut painter = Painter::new();
    painter.paint(&host);

    let mut ticker = tokio::time::interval(config.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => host.tick(wall_clock_secs()),
            Some(completion) = completions.recv() => host.complete(completion),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if let Flow::Quit = handle_line(&mut host, &mut painter, &line) {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed, continuing without interactive input");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
        painter.paint(&host);
    }

    info!("Dashboard stopped");
    Ok(())
}

fn handle_line<D: Dispatcher>(host: &mut Host<D>, painter: &mut Painter, line: &str) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }

    match line.parse::<InputCommand>() {
        Ok(InputCommand::Show(path)) => {
            if let Err(e) = host.show(&path) {
                println!("{}", e);
            }
            painter.invalidate();
        }
        Ok(InputCommand::List) => {
            for (index, path) in host.registry().flattened_paths().iter().enumerate() {
                let marker = if host.current() == Some(path) { "*" } else { " " };
                println!("{} {:>2} {}", marker, index, path);
            }
        }
        Ok(InputCommand::Control(control)) => host.control(control, wall_clock_secs()),
        Ok(InputCommand::Help) => println!("{}", USAGE),
        Ok(InputCommand::Quit) => return Flow::Quit,
        Err(message) => println!("{}", message),
    }
    Flow::Continue
}
