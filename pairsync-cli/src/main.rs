//! A command-line bridge that pairs projects between two production-tracking
//! systems and drives entity synchronization.

mod api;
mod cli;
mod config;
mod sync;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    config::install(config)?;

    cli::commands::dispatch(cli.command).await
}
