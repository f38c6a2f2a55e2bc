//! Market data provider trait definitions.

use crate::error::DataError;
use crate::types::{Lookback, PriceSeries, Timeframe};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of a single historical fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Provider symbol, e.g. `^NSEI`
    pub symbol: String,
    /// How far back from the latest bar
    pub lookback: Lookback,
    /// Bar interval
    pub interval: Timeframe,
}

impl FetchRequest {
    /// Create a new request.
    pub fn new(symbol: impl Into<String>, lookback: Lookback, interval: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            lookback,
            interval,
        }
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.symbol, self.lookback, self.interval)
    }
}

/// Source of historical price series.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Returns
    /// A series ordered from oldest to newest. An unknown window with no
    /// rows is returned as an empty series, not an error.
    async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct FixedProvider;

    #[async_trait]
    impl MarketDataProvider for FixedProvider {
        async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            Ok(PriceSeries::from_closes(request.symbol.clone(), [(date, 100.0)]))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_request_display() {
        let request = FetchRequest::new("^NSEI", Lookback::Years(2), Timeframe::Daily);
        assert_eq!(request.to_string(), "^NSEI (2y, 1d)");
    }

    #[tokio::test]
    async fn test_provider_object_safety() {
        let provider: Box<dyn MarketDataProvider> = Box::new(FixedProvider);
        let request = FetchRequest::new("^GSPC", Lookback::Years(1), Timeframe::Daily);
        let series = provider.fetch(&request).await.unwrap();

        assert_eq!(series.symbol, "^GSPC");
        assert_eq!(series.len(), 1);
        assert_eq!(provider.name(), "fixed");
    }
}
