//! Moving average indicators.

use regime_core::error::IndicatorError;
use regime_core::traits::Indicator;
use serde::{Deserialize, Serialize};

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N values. The first N-1 outputs are `None`.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".into(),
            ));
        }
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result[self.period - 1] = Some(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = Some(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// How the EMA recursion is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Start the recursion at the first value and hide the first N-1
    /// outputs (pandas `ewm(adjust=False, min_periods=N)`).
    #[default]
    FirstValue,
    /// Use the SMA of the first N values as the value at index N-1.
    Sma,
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices with smoothing factor 2/(N+1).
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    seed: EmaSeed,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_seed(period, EmaSeed::default())
    }

    /// Create an EMA with an explicit seeding rule.
    pub fn with_seed(period: usize, seed: EmaSeed) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA period must be greater than 0".into(),
            ));
        }
        let multiplier = 2.0 / (period as f64 + 1.0);
        Ok(Self {
            period,
            multiplier,
            seed,
        })
    }

    /// Smoothing factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let one_minus_mult = 1.0 - self.multiplier;
        let mut ema = match self.seed {
            EmaSeed::FirstValue => data[1..self.period]
                .iter()
                .fold(data[0], |ema, &price| price * self.multiplier + ema * one_minus_mult),
            EmaSeed::Sma => data[..self.period].iter().sum::<f64>() / self.period as f64,
        };
        result[self.period - 1] = Some(ema);

        for (i, &price) in data.iter().enumerate().skip(self.period) {
            ema = price * self.multiplier + ema * one_minus_mult;
            result[i] = Some(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
