//! Suggested equity exposure range.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

use crate::error::RegimeError;

/// Fraction of capital to hold in equities, as a closed range.
///
/// Invariant: `0 <= min <= max <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExposureRange {
    min: Decimal,
    max: Decimal,
}

impl ExposureRange {
    /// Create a range from fractions in [0, 1].
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, RegimeError> {
        if min < Decimal::ZERO || max > Decimal::ONE || min > max {
            return Err(RegimeError::Validation(format!(
                "exposure range {min}..{max} must satisfy 0 <= min <= max <= 1"
            )));
        }
        Ok(Self { min, max })
    }

    /// Build a range, clamping both bounds into [0, 1] and ordering them.
    pub fn clamped(a: Decimal, b: Decimal) -> Self {
        let a = a.clamp(Decimal::ZERO, Decimal::ONE);
        let b = b.clamp(Decimal::ZERO, Decimal::ONE);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Lower fraction.
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Upper fraction.
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Lower bound in percent.
    pub fn min_pct(&self) -> Decimal {
        (self.min * dec!(100)).normalize()
    }

    /// Upper bound in percent.
    pub fn max_pct(&self) -> Decimal {
        (self.max * dec!(100)).normalize()
    }
}

impl fmt::Display for ExposureRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}%", self.min_pct(), self.max_pct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let range = ExposureRange::new(dec!(0.8), dec!(1)).unwrap();

        assert_eq!(range.min(), dec!(0.8));
        assert_eq!(range.max(), dec!(1));
        assert_eq!(range.to_string(), "80-100%");
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(ExposureRange::new(dec!(-0.1), dec!(0.2)).is_err());
        assert!(ExposureRange::new(dec!(0.2), dec!(1.1)).is_err());
        assert!(ExposureRange::new(dec!(0.6), dec!(0.4)).is_err());
    }

    #[test]
    fn test_clamped() {
        let range = ExposureRange::clamped(dec!(1.5), dec!(-0.5));

        assert_eq!(range.min(), Decimal::ZERO);
        assert_eq!(range.max(), Decimal::ONE);
    }

    #[test]
    fn test_zero_range_display() {
        let range = ExposureRange::new(Decimal::ZERO, dec!(0.2)).unwrap();
        assert_eq!(range.to_string(), "0-20%");
    }
}
