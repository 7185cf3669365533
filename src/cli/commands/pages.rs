use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::dashboard::pages::catalog;

#[derive(Args, Default)]
pub struct PagesCommands {}

pub fn pages_command(config: &Config) -> Result<()> {
    let registry = catalog(config).context("Failed to build page catalog")?;
    for (index, path) in registry.flattened_paths().iter().enumerate() {
        println!("{:>2}  {}", index, path);
    }
    Ok(())
}
