//! Equity/cash split for a capital amount.

use regime_core::types::ExposureRange;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Allocation input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Capital must not be negative, got {0}")]
    NegativeCapital(Decimal),

    #[error("Capital is not a number: {0:?}")]
    InvalidCapital(String),
}

/// Equity and cash bands for one capital amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Total capital
    pub capital: Decimal,
    /// Equity at the bottom of the exposure range
    pub equity_min: Decimal,
    /// Equity at the top of the exposure range
    pub equity_max: Decimal,
    /// Cash left when equity is at its maximum
    pub cash_min: Decimal,
    /// Cash left when equity is at its minimum
    pub cash_max: Decimal,
}

impl Allocation {
    /// Copy with every amount rounded to whole currency units.
    pub fn rounded(&self) -> Self {
        let round =
            |v: Decimal| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self {
            capital: round(self.capital),
            equity_min: round(self.equity_min),
            equity_max: round(self.equity_max),
            cash_min: round(self.cash_min),
            cash_max: round(self.cash_max),
        }
    }
}

/// Split `capital` according to `exposure`.
///
/// `equity_min + cash_max == capital` and `equity_max + cash_min == capital`
/// hold exactly.
pub fn allocate(capital: Decimal, exposure: ExposureRange) -> Result<Allocation, AllocationError> {
    if capital < Decimal::ZERO {
        return Err(AllocationError::NegativeCapital(capital));
    }

    let equity_min = capital * exposure.min();
    let equity_max = capital * exposure.max();
    let allocation = Allocation {
        capital,
        equity_min,
        equity_max,
        cash_min: capital - equity_max,
        cash_max: capital - equity_min,
    };

    debug!(%capital, %exposure, ?allocation, "Computed allocation");
    Ok(allocation)
}

/// Parse a user-typed capital figure. Thousands separators, spaces and an
/// optional leading currency symbol are ignored.
pub fn parse_capital(input: &str) -> Result<Decimal, AllocationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(AllocationError::InvalidCapital(input.to_string()));
    }

    let capital = Decimal::from_str(&cleaned)
        .map_err(|_| AllocationError::InvalidCapital(input.to_string()))?;
    if capital < Decimal::ZERO {
        return Err(AllocationError::NegativeCapital(capital));
    }
    Ok(capital)
}
