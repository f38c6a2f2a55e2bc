//! CLI command implementations.

pub mod allocate;
pub mod dashboard;
pub mod report;
pub mod validate;

use anyhow::{Context, Result};
use regime_config::{AppConfig, ProviderKind};
use regime_core::traits::MarketDataProvider;
use regime_data::{CachedProvider, CsvProvider, MarketSnapshot, YahooProvider};
use regime_score::{DashboardReport, Pipeline};
use std::path::Path;
use tracing::info;

/// Build the configured provider. A `--data` directory overrides the
/// configuration and selects CSV files.
pub fn build_provider(
    config: &AppConfig,
    data_dir: Option<&Path>,
) -> Result<Box<dyn MarketDataProvider>> {
    let ttl = config.data.cache_ttl();

    let provider: Box<dyn MarketDataProvider> = match (data_dir, config.data.provider) {
        (Some(dir), _) => Box::new(CachedProvider::new(CsvProvider::new(dir)?, ttl)),
        (None, ProviderKind::Csv) => {
            let dir = config
                .data
                .csv_dir
                .as_deref()
                .context("data.csv_dir is required for the csv provider")?;
            Box::new(CachedProvider::new(CsvProvider::new(dir)?, ttl))
        }
        (None, ProviderKind::Yahoo) => Box::new(CachedProvider::new(
            YahooProvider::with_base_url(config.data.yahoo_base_url.as_str())?,
            ttl,
        )),
    };

    info!(provider = provider.name(), cache_ttl = ?ttl, "Market data provider ready");
    Ok(provider)
}

/// Fetch the configured instruments and run the scoring pipeline once.
pub async fn fetch_report(
    provider: &dyn MarketDataProvider,
    config: &AppConfig,
) -> Result<DashboardReport> {
    let snapshot = MarketSnapshot::fetch(provider, &config.instruments.requests())
        .await
        .context("Failed to fetch market data")?;

    let pipeline = Pipeline::new(config.scoring.params(), config.scoring.history_len);
    let report = pipeline.run(&snapshot.primary, &snapshot.secondary, &snapshot.volatility)?;
    Ok(report)
}
