//! One full scoring run from price series to a dashboard report.

use chrono::NaiveDate;
use regime_allocation::{allocate, Allocation, AllocationError};
use regime_core::error::IndicatorError;
use regime_core::types::{ExposureRange, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backfill::{HistoryPoint, DEFAULT_HISTORY_LEN};
use crate::engine::{ScoreEngine, ScoreParams, ScoreSample};
use crate::regime::Regime;

/// Errors that abort a whole pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No data for primary instrument {symbol}")]
    EmptyData { symbol: String },

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Current score with its regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub sample: ScoreSample,
    pub regime: Regime,
}

impl Assessment {
    /// Score in [0, 100].
    pub fn score(&self) -> u8 {
        self.sample.score
    }

    /// Suggested equity exposure.
    pub fn exposure(&self) -> ExposureRange {
        self.regime.exposure()
    }
}

impl From<ScoreSample> for Assessment {
    fn from(sample: ScoreSample) -> Self {
        let regime = sample.regime();
        Self { sample, regime }
    }
}

/// Everything the presentation layer shows after one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Primary instrument symbol
    pub primary_symbol: String,
    /// Date of the latest primary bar
    pub last_date: NaiveDate,
    /// Latest primary close
    pub last_close: f64,
    /// Assessment at the latest bar, `None` while indicators warm up
    pub current: Option<Assessment>,
    /// Score history, oldest first
    pub history: Vec<HistoryPoint>,
}

impl DashboardReport {
    /// Split `capital` according to the current regime.
    ///
    /// Returns `Ok(None)` when there is no current assessment. Negative
    /// capital is rejected either way.
    pub fn allocation(&self, capital: Decimal) -> Result<Option<Allocation>, AllocationError> {
        if capital < Decimal::ZERO {
            return Err(AllocationError::NegativeCapital(capital));
        }
        self.current
            .as_ref()
            .map(|current| allocate(capital, current.exposure()))
            .transpose()
    }

    /// Number of history points with a defined score.
    pub fn defined_history(&self) -> usize {
        self.history.iter().filter(|p| p.score.is_some()).count()
    }
}

/// Scoring pipeline with fixed parameters.
#[derive(Debug, Clone)]
pub struct Pipeline {
    params: ScoreParams,
    history_len: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ScoreParams::default(), DEFAULT_HISTORY_LEN)
    }
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new(params: ScoreParams, history_len: usize) -> Self {
        Self {
            params,
            history_len,
        }
    }

    /// Indicator windows in use.
    pub fn params(&self) -> &ScoreParams {
        &self.params
    }

    /// Run the engine, classifier and backfill over the three series.
    pub fn run(
        &self,
        primary: &PriceSeries,
        secondary: &PriceSeries,
        volatility: &PriceSeries,
    ) -> Result<DashboardReport, PipelineError> {
        let last = primary.last().ok_or_else(|| PipelineError::EmptyData {
            symbol: primary.symbol.clone(),
        })?;

        debug!(
            primary = primary.len(),
            secondary = secondary.len(),
            volatility = volatility.len(),
            "Running score pipeline"
        );

        let engine = ScoreEngine::new(&self.params, primary, secondary, volatility)?;
        let current = engine.latest().map(Assessment::from);
        let history: Vec<HistoryPoint> = engine.backfill(self.history_len).collect();

        match &current {
            Some(assessment) => info!(
                score = assessment.score(),
                regime = %assessment.regime,
                exposure = %assessment.exposure(),
                "Market regime assessed"
            ),
            None => warn!(
                symbol = %primary.symbol,
                bars = primary.len(),
                "Not enough history to score the latest bar"
            ),
        }

        Ok(DashboardReport {
            primary_symbol: primary.symbol.clone(),
            last_date: last.date,
            last_close: last.close,
            current,
            history,
        })
    }
}
