//! Main entry point for the Infamous bot.

use anyhow::{Context as _, Result};
use clap::Parser;
use infamous_bot::InfamousBot;
use infamous_common::{init_logging, LoggingConfig};
use infamous_config::ConfigLoader;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        ConfigLoader::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Dropping the guard flushes buffered file output.
    let _log_guard = init_logging(&LoggingConfig::from(&config.logging))?;
    info!("Starting Infamous bot v{}", env!("CARGO_PKG_VERSION"));

    let bot = InfamousBot::new(config);
    if let Err(e) = bot.start().await {
        error!("Bot stopped with an error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
