//! Yahoo Finance chart endpoint provider.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use regime_core::error::DataError;
use regime_core::traits::{FetchRequest, MarketDataProvider};
use regime_core::types::{Bar, PriceSeries, Timeframe};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = concat!("regime/", env!("CARGO_PKG_VERSION"));

/// Ranges the chart endpoint accepts as-is.
const NAMED_RANGES: [&str; 9] = ["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y"];

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Fetches daily history from the Yahoo Finance chart API.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a provider against the public endpoint.
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider against another endpoint, e.g. a proxy.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, request.symbol);
        let params = chart_params(request, Utc::now().date_naive());

        debug!(request = %request, "Requesting chart");
        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(request.symbol.clone()));
        }
        if !status.is_success() {
            return Err(DataError::Provider(format!("{}: {}", status, body)));
        }

        parse_chart(&request.symbol, request.interval, &body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Query parameters for a chart request ending at `today`.
///
/// Lookbacks the endpoint names directly go out as `range`; any other
/// window is sent as explicit `period1`/`period2` bounds.
fn chart_params(request: &FetchRequest, today: NaiveDate) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(3);
    let range = request.lookback.to_string();
    if NAMED_RANGES.contains(&range.as_str()) {
        params.push(("range", range));
    } else {
        let start = request.lookback.start_from(today);
        let end = today.succ_opt().unwrap_or(today);
        params.push(("period1", midnight_ts(start).to_string()));
        params.push(("period2", midnight_ts(end).to_string()));
    }
    params.push(("interval", request.interval.to_string()));
    params
}

fn midnight_ts(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Convert a chart payload into a series. Rows without a close are dropped.
fn parse_chart(symbol: &str, interval: Timeframe, body: &str) -> Result<PriceSeries, DataError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(error) = response.chart.error {
        return Err(match error.code.as_str() {
            "Not Found" => DataError::SymbolNotFound(symbol.to_string()),
            _ => DataError::Provider(format!(
                "{}: {}",
                error.code,
                error.description.unwrap_or_default()
            )),
        });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol, interval));
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = Duration::seconds(result.meta.gmtoffset);
    let field = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = field(&quote.close, i) else {
            skipped += 1;
            continue;
        };
        let Some(time) = DateTime::from_timestamp(ts, 0) else {
            skipped += 1;
            continue;
        };
        // Dates are taken in the exchange's own time zone.
        let date = (time + offset).date_naive();

        bars.push(Bar::new(
            date,
            field(&quote.open, i).unwrap_or(close),
            field(&quote.high, i).unwrap_or(close),
            field(&quote.low, i).unwrap_or(close),
            close,
            field(&quote.volume, i).unwrap_or_default(),
        ));
    }

    if skipped > 0 {
        warn!(symbol, skipped, "Dropped chart rows without a close");
    }

    Ok(PriceSeries::new(symbol, interval, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regime_core::types::Lookback;

    const NSEI_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^NSEI", "currency": "INR", "gmtoffset": 19800},
                "timestamp": [1705290300, 1705376700, 1705463100],
                "indicators": {
                    "quote": [{
                        "open":   [21800.0, 22000.0, 21700.0],
                        "high":   [22100.0, 22120.0, 21900.0],
                        "low":    [21750.0, 21950.0, 21550.0],
                        "close":  [22097.45, null, 21571.95],
                        "volume": [300000, 0, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart() {
        let series = parse_chart("^NSEI", Timeframe::Daily, NSEI_CHART).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol, "^NSEI");
        let first = series.first().unwrap();
        // 03:45 UTC is 09:15 in Mumbai on the same day.
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.close, 22097.45);
        assert_eq!(first.volume, 300000.0);

        let last = series.last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(last.volume, 0.0);
    }

    #[test]
    fn test_parse_chart_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse_chart("^BAD", Timeframe::Daily, body),
            Err(DataError::SymbolNotFound(s)) if s == "^BAD"
        ));

        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(
            parse_chart("^NSEI", Timeframe::Daily, body),
            Err(DataError::Provider(_))
        ));
    }

    #[test]
    fn test_parse_chart_without_rows() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart("^GSPC", Timeframe::Daily, body).unwrap();

        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_chart("^GSPC", Timeframe::Daily, "<html>"),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_named_range_sent_as_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let request = FetchRequest::new("^NSEI", Lookback::Years(2), Timeframe::Daily);

        let params = chart_params(&request, today);
        assert_eq!(
            params,
            vec![("range", "2y".to_string()), ("interval", "1d".to_string())]
        );
    }

    #[test]
    fn test_custom_range_sent_as_periods() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let request = FetchRequest::new("^INDIAVIX", Lookback::Days(30), Timeframe::Daily);

        // 2024-02-14 and 2024-03-16 at midnight UTC
        let params = chart_params(&request, today);
        assert_eq!(
            params,
            vec![
                ("period1", "1707868800".to_string()),
                ("period2", "1710547200".to_string()),
                ("interval", "1d".to_string()),
            ]
        );

        let request = FetchRequest::new("^GSPC", Lookback::Months(4), Timeframe::Weekly);
        let params = chart_params(&request, today);
        assert_eq!(params[0].0, "period1");
        assert!(params.iter().all(|(key, _)| *key != "range"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = YahooProvider::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.name(), "yahoo");
    }
}
