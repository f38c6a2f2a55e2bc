//! Score history backfill.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::ScoreEngine;

/// One trading year of daily bars.
pub const DEFAULT_HISTORY_LEN: usize = 252;

/// A point of the score history.
///
/// `date` is `None` when the primary series is shorter than the requested
/// history; `score` is `None` when the sample is undefined at that bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: Option<NaiveDate>,
    pub score: Option<u8>,
}

/// Lazy replay of the score engine over the last `len` bars, oldest first.
///
/// Always yields exactly `len` points. Create a new one from the engine to
/// start over.
#[derive(Debug)]
pub struct HistoryBackfill<'a> {
    engine: &'a ScoreEngine<'a>,
    len: usize,
    next: usize,
}

impl<'a> HistoryBackfill<'a> {
    pub(crate) fn new(engine: &'a ScoreEngine<'a>, len: usize) -> Self {
        Self {
            engine,
            len,
            next: 0,
        }
    }
}

impl Iterator for HistoryBackfill<'_> {
    type Item = HistoryPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let offset = self.len - self.next;
        self.next += 1;

        let date = self.engine.primary().from_end(offset).map(|bar| bar.date);
        let score = match (date, isize::try_from(offset)) {
            (Some(_), Ok(offset)) => self.engine.compute_score(-offset).map(|s| s.score),
            _ => None,
        };

        Some(HistoryPoint { date, score })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HistoryBackfill<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{series, small_params};
    use crate::engine::ScoreParams;

    fn trending(len: usize, step: f64) -> Vec<f64> {
        (0..len).map(|i| 100.0 + i as f64 * step).collect()
    }

    #[test]
    fn test_backfill_length_is_exact() {
        let primary = series("^NSEI", &trending(300, 1.0));
        let secondary = series("^GSPC", &trending(300, 1.0));
        let volatility = series("^INDIAVIX", &trending(300, -0.1));
        let engine = ScoreEngine::new(
            &ScoreParams::default(),
            &primary,
            &secondary,
            &volatility,
        )
        .unwrap();

        let history: Vec<_> = engine.backfill(DEFAULT_HISTORY_LEN).collect();
        assert_eq!(history.len(), DEFAULT_HISTORY_LEN);

        // EMA(200) is first defined at index 199, i.e. 101 bars from the end.
        let defined = history.iter().filter(|p| p.score.is_some()).count();
        assert_eq!(defined, 101);
        assert!(history[..151].iter().all(|p| p.score.is_none()));
        assert!(history[151..].iter().all(|p| p.score == Some(100)));
    }

    #[test]
    fn test_backfill_dates_follow_primary() {
        let primary = series("^NSEI", &trending(10, 1.0));
        let engine = ScoreEngine::new(&small_params(), &primary, &primary, &primary).unwrap();

        let history: Vec<_> = engine.backfill(4).collect();
        let expected: Vec<_> = primary.dates()[6..].iter().copied().map(Some).collect();
        assert_eq!(history.iter().map(|p| p.date).collect::<Vec<_>>(), expected);
        assert_eq!(history.last().unwrap().score, engine.latest().map(|s| s.score));
    }

    #[test]
    fn test_backfill_longer_than_series() {
        let primary = series("^NSEI", &trending(5, 1.0));
        let engine = ScoreEngine::new(&small_params(), &primary, &primary, &primary).unwrap();

        let history: Vec<_> = engine.backfill(8).collect();
        assert_eq!(history.len(), 8);
        assert!(history[..3].iter().all(|p| p.date.is_none() && p.score.is_none()));
        assert!(history[3..].iter().all(|p| p.date.is_some()));
    }

    #[test]
    fn test_backfill_empty_primary() {
        let primary = series("^NSEI", &[]);
        let engine = ScoreEngine::new(&small_params(), &primary, &primary, &primary).unwrap();

        let history: Vec<_> = engine.backfill(DEFAULT_HISTORY_LEN).collect();
        assert_eq!(history.len(), DEFAULT_HISTORY_LEN);
        assert!(history.iter().all(|p| *p == HistoryPoint { date: None, score: None }));
    }

    #[test]
    fn test_backfill_restartable() {
        let primary = series("^NSEI", &trending(30, 0.5));
        let engine = ScoreEngine::new(&small_params(), &primary, &primary, &primary).unwrap();

        let mut partial = engine.backfill(20);
        assert_eq!(partial.len(), 20);
        partial.next();
        assert_eq!(partial.len(), 19);

        let first: Vec<_> = engine.backfill(20).collect();
        let second: Vec<_> = engine.backfill(20).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_length_backfill() {
        let primary = series("^NSEI", &trending(30, 0.5));
        let engine = ScoreEngine::new(&small_params(), &primary, &primary, &primary).unwrap();

        assert_eq!(engine.backfill(0).count(), 0);
    }
}
