//! Institutional market regime dashboard CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use regime_config::load_config;
use regime_monitor::{setup_logging, LogOutput};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(cli.config.as_deref()).await;
    }

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;

    // Setup logging; the TUI owns the terminal so its logs only go to file
    let log_level = cli
        .log_level
        .map(|level| level.as_str())
        .unwrap_or(config.logging.level.as_str());
    let json = cli.json_logs || config.logging.is_json();
    let output = match cli.command {
        Commands::Dashboard(_) => LogOutput::FileOnly,
        _ => LogOutput::Console,
    };
    let _guard = setup_logging(log_level, json, output, config.logging.file.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Report(args) => cli::commands::report::run(args, &config).await,
        Commands::Dashboard(args) => cli::commands::dashboard::run(args, &config).await,
        Commands::Allocate(args) => cli::commands::allocate::run(args, &config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
