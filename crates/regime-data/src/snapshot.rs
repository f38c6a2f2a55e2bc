//! The three series needed by one scoring run.

use regime_core::error::DataError;
use regime_core::traits::{FetchRequest, MarketDataProvider};
use regime_core::types::{Lookback, PriceSeries, Timeframe};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Fetch requests for the primary, secondary and volatility instruments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSet {
    pub primary: FetchRequest,
    pub secondary: FetchRequest,
    pub volatility: FetchRequest,
}

impl Default for InstrumentSet {
    fn default() -> Self {
        Self {
            primary: FetchRequest::new("^NSEI", Lookback::Years(2), Timeframe::Daily),
            secondary: FetchRequest::new("^GSPC", Lookback::Years(1), Timeframe::Daily),
            volatility: FetchRequest::new("^INDIAVIX", Lookback::Years(1), Timeframe::Daily),
        }
    }
}

/// Series fetched for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub primary: PriceSeries,
    pub secondary: PriceSeries,
    pub volatility: PriceSeries,
}

impl MarketSnapshot {
    /// Fetch all three instruments concurrently.
    ///
    /// Any failed fetch fails the whole snapshot.
    pub async fn fetch(
        provider: &dyn MarketDataProvider,
        instruments: &InstrumentSet,
    ) -> Result<Self, DataError> {
        let (primary, secondary, volatility) = futures::try_join!(
            provider.fetch(&instruments.primary),
            provider.fetch(&instruments.secondary),
            provider.fetch(&instruments.volatility),
        )?;

        for series in [&primary, &secondary, &volatility] {
            if series.is_empty() {
                warn!(symbol = %series.symbol, provider = provider.name(), "Empty series");
            }
        }

        info!(
            provider = provider.name(),
            primary = primary.len(),
            secondary = secondary.len(),
            volatility = volatility.len(),
            "Market snapshot fetched"
        );

        Ok(Self {
            primary,
            secondary,
            volatility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};

    struct StubProvider {
        missing: Option<&'static str>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError> {
            if self.missing == Some(request.symbol.as_str()) {
                return Err(DataError::SymbolNotFound(request.symbol.clone()));
            }
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let count = match request.lookback {
                Lookback::Years(n) => n as u64 * 10,
                _ => 1,
            };
            Ok(PriceSeries::from_closes(
                request.symbol.clone(),
                (0..count).map(|i| (start + Days::new(i), i as f64)),
            ))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_fetch_all_three() {
        let provider = StubProvider { missing: None };
        let snapshot = MarketSnapshot::fetch(&provider, &InstrumentSet::default())
            .await
            .unwrap();

        assert_eq!(snapshot.primary.symbol, "^NSEI");
        assert_eq!(snapshot.primary.len(), 20);
        assert_eq!(snapshot.secondary.symbol, "^GSPC");
        assert_eq!(snapshot.volatility.symbol, "^INDIAVIX");
        assert_eq!(snapshot.volatility.len(), 10);
    }

    #[tokio::test]
    async fn test_one_failure_fails_snapshot() {
        let provider = StubProvider {
            missing: Some("^INDIAVIX"),
        };
        let result = MarketSnapshot::fetch(&provider, &InstrumentSet::default()).await;

        assert!(matches!(result, Err(DataError::SymbolNotFound(s)) if s == "^INDIAVIX"));
    }
}
