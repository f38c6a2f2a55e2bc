//! Price series container.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bar, Timeframe};

/// Date-ordered bars for one instrument.
///
/// Bars are strictly ascending by date. Construction sorts the input and
/// collapses duplicate dates, keeping the last row seen for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Bar interval
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps input order within a date, so the last row wins below.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            timeframe,
            bars: deduped,
        }
    }

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Build a daily series from (date, close) pairs.
    pub fn from_closes(
        symbol: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let bars = points
            .into_iter()
            .map(|(date, close)| Bar::from_close(date, close))
            .collect();
        Self::new(symbol, Timeframe::Daily, bars)
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the bar `offset` positions back from the end (1 = last).
    pub fn from_end(&self, offset: usize) -> Option<&Bar> {
        if offset == 0 {
            return None;
        }
        self.len().checked_sub(offset).and_then(|i| self.bars.get(i))
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Keep only bars dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        let from = self.bars.partition_point(|b| b.date < start);
        Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            bars: self.bars[from..].to_vec(),
        }
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_sorts_ascending() {
        let series =
            PriceSeries::from_closes("^NSEI", [(day(3), 3.0), (day(1), 1.0), (day(2), 2.0)]);

        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.dates(), vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn test_series_drops_duplicate_dates() {
        let series =
            PriceSeries::from_closes("^NSEI", [(day(1), 1.0), (day(2), 2.0), (day(2), 2.5)]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 2.5);
    }

    #[test]
    fn test_from_end() {
        let series =
            PriceSeries::from_closes("^GSPC", [(day(1), 1.0), (day(2), 2.0), (day(3), 3.0)]);

        assert_eq!(series.from_end(1).unwrap().close, 3.0);
        assert_eq!(series.from_end(3).unwrap().close, 1.0);
        assert!(series.from_end(0).is_none());
        assert!(series.from_end(4).is_none());
    }

    #[test]
    fn test_since() {
        let series = PriceSeries::from_closes("^GSPC", (1..=10).map(|d| (day(d), d as f64)));
        let trimmed = series.since(day(8));

        assert_eq!(trimmed.closes(), vec![8.0, 9.0, 10.0]);
        assert_eq!(trimmed.symbol, "^GSPC");
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("^INDIAVIX", Timeframe::Daily);

        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.from_end(1).is_none());
    }
}
