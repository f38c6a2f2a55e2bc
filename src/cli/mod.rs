//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use regime_allocation::parse_capital;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regime")]
#[command(author, version, about = "Institutional market regime dashboard")]
pub struct Cli {
    /// Configuration file path [default: config/default.toml if present]
    #[arg(short, long, env = "REGIME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides logging.level from the configuration
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch data, score the market and print the report
    Report(ReportArgs),
    /// Start the interactive dashboard
    Dashboard(DashboardArgs),
    /// Show the regime and allocation for a given score
    Allocate(AllocateArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Capital to allocate, e.g. 2000000 or "₹20,00,000"
    #[arg(long, value_parser = capital)]
    pub capital: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Print the full score history
    #[arg(long)]
    pub history: bool,

    /// Read CSV files from this directory instead of the configured provider
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct DashboardArgs {
    /// Starting capital for the allocation panel
    #[arg(long, value_parser = capital)]
    pub capital: Option<Decimal>,

    /// Read CSV files from this directory instead of the configured provider
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct AllocateArgs {
    /// Institutional score (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub score: u8,

    /// Capital to allocate
    #[arg(long, value_parser = capital)]
    pub capital: Decimal,
}

fn capital(s: &str) -> Result<Decimal, String> {
    parse_capital(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from([
            "regime",
            "--log-level",
            "debug",
            "report",
            "--capital",
            "20,00,000",
            "--output",
            "json",
            "--history",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.capital, Some(dec!(2000000)));
                assert!(matches!(args.output, OutputFormat::Json));
                assert!(args.history);
                assert!(args.data.is_none());
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_allocate_score_range() {
        let parse = |score: &str, capital: &str| {
            Cli::try_parse_from(["regime", "allocate", "--score", score, "--capital", capital])
        };

        assert!(parse("100", "1000").is_ok());
        assert!(parse("101", "1000").is_err());
        assert!(parse("50", "abc").is_err());
    }
}
