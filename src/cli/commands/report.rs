//! Report command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regime_allocation::Allocation;
use regime_config::AppConfig;
use regime_score::{DashboardReport, PipelineError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{build_provider, fetch_report};
use crate::cli::{OutputFormat, ReportArgs};

/// JSON document printed by `report --output json`.
#[derive(Serialize)]
struct ReportOutput<'a> {
    generated_at: DateTime<Local>,
    capital: Decimal,
    currency: &'a str,
    allocation: Option<Allocation>,
    report: &'a DashboardReport,
}

pub async fn run(args: ReportArgs, config: &AppConfig) -> Result<()> {
    let provider = build_provider(config, args.data.as_deref())?;
    let report = match fetch_report(provider.as_ref(), config).await {
        Ok(report) => report,
        Err(e) if is_empty_data(&e) => {
            // Nothing to display rather than a failure
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let capital = args.capital.unwrap_or(config.allocation.default_capital);
    let currency = config.allocation.currency_symbol.as_str();
    let generated_at = Local::now();

    match args.output {
        OutputFormat::Json => {
            let output = ReportOutput {
                generated_at,
                capital,
                currency,
                allocation: report.allocation(capital)?,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", report.summary(Some(capital), currency));
            println!("Last Updated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
            if args.history {
                println!();
                println!("{}", report.history_table());
            }
        }
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}

fn is_empty_data(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<PipelineError>(),
        Some(PipelineError::EmptyData { .. })
    )
}
