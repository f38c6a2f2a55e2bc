//! Institutional score engine.
//!
//! The score is the sum of five independently evaluated conditions:
//!
//! | condition | weight |
//! |---|---|
//! | primary close above slow EMA | 30 |
//! | secondary close above its rolling mean | 20 |
//! | volatility close below its rolling mean | 20 |
//! | fast EMA above slow EMA | 15 |
//! | primary close above fast EMA | 15 |
//!
//! A sample is only produced when every input is defined at the
//! requested bar; there is no partial credit for missing history.

use chrono::NaiveDate;
use regime_core::error::IndicatorError;
use regime_core::traits::Indicator;
use regime_core::types::PriceSeries;
use regime_indicators::{Ema, EmaSeed, Sma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backfill::HistoryBackfill;
use crate::regime::{classify, Regime};

/// One weighted condition of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Primary close above its slow EMA (long-term trend).
    PrimaryAboveSlowEma,
    /// Secondary close above its rolling mean (broad market confirmation).
    SecondaryAboveMean,
    /// Volatility close below its rolling mean.
    VolatilityBelowMean,
    /// Fast EMA above slow EMA (golden cross state).
    FastAboveSlowEma,
    /// Primary close above its fast EMA (short-term momentum).
    PrimaryAboveFastEma,
}

impl Condition {
    /// All conditions in evaluation order.
    pub const ALL: [Condition; 5] = [
        Condition::PrimaryAboveSlowEma,
        Condition::SecondaryAboveMean,
        Condition::VolatilityBelowMean,
        Condition::FastAboveSlowEma,
        Condition::PrimaryAboveFastEma,
    ];

    /// Points contributed when the condition holds.
    pub const fn weight(&self) -> u8 {
        match self {
            Condition::PrimaryAboveSlowEma => 30,
            Condition::SecondaryAboveMean => 20,
            Condition::VolatilityBelowMean => 20,
            Condition::FastAboveSlowEma => 15,
            Condition::PrimaryAboveFastEma => 15,
        }
    }

    /// Short description for display.
    pub fn description(&self) -> &'static str {
        match self {
            Condition::PrimaryAboveSlowEma => "Long-term trend (close > slow EMA)",
            Condition::SecondaryAboveMean => "Broad market confirmation",
            Condition::VolatilityBelowMean => "Volatility below average",
            Condition::FastAboveSlowEma => "Golden cross (fast EMA > slow EMA)",
            Condition::PrimaryAboveFastEma => "Short-term momentum (close > fast EMA)",
        }
    }
}

/// Whether a condition held at a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub condition: Condition,
    pub met: bool,
}

impl ConditionOutcome {
    /// Points this outcome contributes.
    pub fn points(&self) -> u8 {
        if self.met {
            self.condition.weight()
        } else {
            0
        }
    }
}

/// Fully defined inputs of one score evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub primary_close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub secondary_close: f64,
    pub secondary_mean: f64,
    pub volatility_close: f64,
    pub volatility_mean: f64,
}

impl ScoreInputs {
    /// Evaluate every condition.
    pub fn evaluate(&self) -> [ConditionOutcome; 5] {
        Condition::ALL.map(|condition| {
            let met = match condition {
                Condition::PrimaryAboveSlowEma => self.primary_close > self.ema_slow,
                Condition::SecondaryAboveMean => self.secondary_close > self.secondary_mean,
                Condition::VolatilityBelowMean => self.volatility_close < self.volatility_mean,
                Condition::FastAboveSlowEma => self.ema_fast > self.ema_slow,
                Condition::PrimaryAboveFastEma => self.primary_close > self.ema_fast,
            };
            ConditionOutcome { condition, met }
        })
    }

    /// Sum of the weights of the conditions that hold.
    pub fn score(&self) -> u8 {
        self.evaluate().iter().map(ConditionOutcome::points).sum()
    }
}

/// Score computed at one bar of the primary series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSample {
    /// Position in the primary series (0 = oldest)
    pub index: usize,
    /// Date of the primary bar
    pub date: NaiveDate,
    /// Score in [0, 100]
    pub score: u8,
    /// Outcome of each condition
    pub outcomes: [ConditionOutcome; 5],
}

impl ScoreSample {
    fn new(index: usize, date: NaiveDate, inputs: &ScoreInputs) -> Self {
        let outcomes = inputs.evaluate();
        let score = outcomes.iter().map(ConditionOutcome::points).sum();
        Self {
            index,
            date,
            score,
            outcomes,
        }
    }

    /// Regime for this sample's score.
    pub fn regime(&self) -> Regime {
        classify(self.score)
    }
}

/// Indicator windows used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreParams {
    /// Fast EMA period on the primary series
    pub ema_fast: usize,
    /// Slow EMA period on the primary series
    pub ema_slow: usize,
    /// Rolling mean period on the secondary series
    pub secondary_ma: usize,
    /// Rolling mean period on the volatility series
    pub volatility_ma: usize,
    /// EMA seeding rule
    #[serde(default)]
    pub ema_seed: EmaSeed,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            ema_fast: 50,
            ema_slow: 200,
            secondary_ma: 50,
            volatility_ma: 20,
            ema_seed: EmaSeed::FirstValue,
        }
    }
}

/// Fast and slow EMAs of the primary series, aligned with its bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
}

impl IndicatorSet {
    /// Compute both EMAs over the primary closes.
    pub fn compute(primary: &PriceSeries, params: &ScoreParams) -> Result<Self, IndicatorError> {
        let closes = primary.closes();
        Ok(Self {
            ema_fast: aligned(&Ema::with_seed(params.ema_fast, params.ema_seed)?, &closes),
            ema_slow: aligned(&Ema::with_seed(params.ema_slow, params.ema_seed)?, &closes),
        })
    }
}

/// Run an indicator over `values`, keeping one output per input bar.
fn aligned(indicator: &dyn Indicator, values: &[f64]) -> Vec<Option<f64>> {
    let output = indicator.calculate(values);
    debug!(
        indicator = indicator.name(),
        period = indicator.period(),
        defined = output.iter().flatten().count(),
        "Computed indicator"
    );
    output
}

/// Evaluates the score over three read-only price series.
#[derive(Debug)]
pub struct ScoreEngine<'a> {
    primary: &'a PriceSeries,
    secondary: &'a PriceSeries,
    volatility: &'a PriceSeries,
    indicators: IndicatorSet,
    secondary_mean: Vec<Option<f64>>,
    volatility_mean: Vec<Option<f64>>,
}

impl<'a> ScoreEngine<'a> {
    /// Precompute every indicator the conditions need.
    pub fn new(
        params: &ScoreParams,
        primary: &'a PriceSeries,
        secondary: &'a PriceSeries,
        volatility: &'a PriceSeries,
    ) -> Result<Self, IndicatorError> {
        let indicators = IndicatorSet::compute(primary, params)?;
        let secondary_mean = aligned(&Sma::new(params.secondary_ma)?, &secondary.closes());
        let volatility_mean = aligned(&Sma::new(params.volatility_ma)?, &volatility.closes());

        Ok(Self {
            primary,
            secondary,
            volatility,
            indicators,
            secondary_mean,
            volatility_mean,
        })
    }

    /// Primary series the engine indexes into.
    pub fn primary(&self) -> &PriceSeries {
        self.primary
    }

    /// EMAs of the primary series.
    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// Score at `index` of the primary series.
    ///
    /// A non-negative index counts from the oldest bar; a negative index
    /// counts from the end (`-1` is the latest bar). The position is turned
    /// into a distance from the end of the primary series and the same
    /// distance is used on the secondary and volatility series.
    ///
    /// Returns `None` when the index is out of range for any series or any
    /// indicator is still warming up at that bar.
    pub fn compute_score(&self, index: isize) -> Option<ScoreSample> {
        let offset = self.offset_from_end(index)?;
        let position = self.primary.len() - offset;
        let inputs = self.inputs_at(offset)?;
        let date = self.primary.get(position)?.date;

        Some(ScoreSample::new(position, date, &inputs))
    }

    /// Score at the latest bar.
    pub fn latest(&self) -> Option<ScoreSample> {
        self.compute_score(-1)
    }

    /// Lazily replay the engine over the last `len` bars.
    pub fn backfill(&self, len: usize) -> HistoryBackfill<'_> {
        HistoryBackfill::new(self, len)
    }

    fn offset_from_end(&self, index: isize) -> Option<usize> {
        let len = self.primary.len();
        if index < 0 {
            let offset = index.unsigned_abs();
            (offset <= len).then_some(offset)
        } else {
            let position = index as usize;
            (position < len).then(|| len - position)
        }
    }

    fn inputs_at(&self, offset: usize) -> Option<ScoreInputs> {
        let p = self.primary.len().checked_sub(offset)?;
        let s = self.secondary.len().checked_sub(offset)?;
        let v = self.volatility.len().checked_sub(offset)?;

        Some(ScoreInputs {
            primary_close: self.primary.get(p)?.close,
            ema_fast: (*self.indicators.ema_fast.get(p)?)?,
            ema_slow: (*self.indicators.ema_slow.get(p)?)?,
            secondary_close: self.secondary.get(s)?.close,
            secondary_mean: (*self.secondary_mean.get(s)?)?,
            volatility_close: self.volatility.get(v)?.close,
            volatility_mean: (*self.volatility_mean.get(v)?)?,
        })
    }
}
