//! CSV market data provider.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use regime_core::error::DataError;
use regime_core::traits::{FetchRequest, MarketDataProvider};
use regime_core::types::{Bar, PriceSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open", default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// Reads `{dir}/{symbol}.csv` files.
///
/// Index symbols such as `^NSEI` are also looked up without the caret and
/// in lower case (`NSEI.csv`, `nsei.csv`). Rows without a close price are
/// skipped. The series is trimmed to the requested lookback, counted back
/// from the latest row in the file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    /// Create a provider over a data directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Provider(format!(
                "data directory '{}' does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Locate the file for a symbol.
    fn resolve(&self, symbol: &str) -> Option<PathBuf> {
        let bare = symbol.trim_start_matches('^');
        let candidates = [
            symbol.to_string(),
            bare.to_string(),
            bare.to_lowercase(),
            format!("{}_daily", bare),
            format!("{}_daily", bare.to_lowercase()),
        ];
        candidates
            .iter()
            .map(|name| self.dir.join(format!("{}.csv", name)))
            .find(|path| path.is_file())
    }

    /// Load bars from a specific path.
    fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let Some(close) = record.close.or(record.adj_close) else {
                continue;
            };
            let date = parse_date(&record.date)?;

            bars.push(Bar::new(
                date,
                record.open.unwrap_or(close),
                record.high.unwrap_or(close),
                record.low.unwrap_or(close),
                close,
                record.volume.unwrap_or_default(),
            ));
        }

        Ok(bars)
    }
}

#[async_trait]
impl MarketDataProvider for CsvProvider {
    async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError> {
        let path = self
            .resolve(&request.symbol)
            .ok_or_else(|| DataError::SymbolNotFound(request.symbol.clone()))?;

        let bars = tokio::task::spawn_blocking({
            let path = path.clone();
            move || Self::load_from_path(&path)
        })
        .await
        .map_err(|e| DataError::Provider(e.to_string()))??;

        let series = PriceSeries::new(request.symbol.clone(), request.interval, bars);
        let series = match series.last() {
            Some(last) => series.since(request.lookback.start_from(last.date)),
            None => series,
        };

        debug!(
            symbol = %request.symbol,
            path = %path.display(),
            bars = series.len(),
            "Loaded CSV series"
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse the date formats commonly found in exported price files.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    // Exchange-local timestamps keep their own calendar date.
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regime_core::types::{Lookback, Timeframe};
    use std::fs;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date("2024/01/15").unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date("01/15/2024").unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), ymd(2024, 1, 15));
        assert_eq!(
            parse_date("2024-01-15 00:00:00+05:30").unwrap(),
            ymd(2024, 1, 15)
        );
        assert_eq!(parse_date("1705312800").unwrap(), ymd(2024, 1, 15)); // Unix sec
        assert_eq!(parse_date("1705312800000").unwrap(), ymd(2024, 1, 15)); // Unix ms
        assert!(parse_date("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_trims_to_lookback() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
        for month in 1..=12 {
            body.push_str(&format!(
                "2024-{:02}-01,{o},{o},{o},{c},{c},100\n",
                month,
                o = 100 + month,
                c = 101 + month
            ));
        }
        fs::write(dir.path().join("NSEI.csv"), body).unwrap();

        let provider = CsvProvider::new(dir.path()).unwrap();
        let request = FetchRequest::new("^NSEI", Lookback::Months(6), Timeframe::Daily);
        let series = provider.fetch(&request).await.unwrap();

        assert_eq!(series.symbol, "^NSEI");
        assert_eq!(series.len(), 7); // 2024-06-01 ..= 2024-12-01
        assert_eq!(series.first().unwrap().date, ymd(2024, 6, 1));
        assert_eq!(series.last().unwrap().close, 113.0);
    }

    #[tokio::test]
    async fn test_fetch_skips_missing_close_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("gspc.csv"),
            "date,close\n2024-01-03,3\n2024-01-01,1\n2024-01-02,\n",
        )
        .unwrap();

        let provider = CsvProvider::new(dir.path()).unwrap();
        let request = FetchRequest::new("^GSPC", Lookback::Years(1), Timeframe::Daily);
        let series = provider.fetch(&request).await.unwrap();

        assert_eq!(series.closes(), vec![1.0, 3.0]);
        assert_eq!(series.first().unwrap().open, 1.0);
    }

    #[tokio::test]
    async fn test_fetch_header_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("INDIAVIX.csv"), "Date,Close\n").unwrap();

        let provider = CsvProvider::new(dir.path()).unwrap();
        let request = FetchRequest::new("^INDIAVIX", Lookback::Years(1), Timeframe::Daily);

        assert!(provider.fetch(&request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path()).unwrap();
        let request = FetchRequest::new("^NSEI", Lookback::Years(2), Timeframe::Daily);

        assert!(matches!(
            provider.fetch(&request).await,
            Err(DataError::SymbolNotFound(s)) if s == "^NSEI"
        ));
    }

    #[test]
    fn test_missing_directory() {
        assert!(CsvProvider::new("/definitely/not/here").is_err());
    }
}
