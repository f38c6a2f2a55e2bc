//! Market regime bands.

use regime_core::types::ExposureRange;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete market condition derived from the institutional score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    StrongBull,
    ModerateBull,
    Neutral,
    Defensive,
    HighRiskBear,
}

impl Regime {
    /// All regimes, highest band first.
    pub const ALL: [Regime; 5] = [
        Regime::StrongBull,
        Regime::ModerateBull,
        Regime::Neutral,
        Regime::Defensive,
        Regime::HighRiskBear,
    ];

    /// Inclusive lower score bound of the band.
    pub fn threshold(&self) -> u8 {
        match self {
            Regime::StrongBull => 75,
            Regime::ModerateBull => 55,
            Regime::Neutral => 35,
            Regime::Defensive => 20,
            Regime::HighRiskBear => 0,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Regime::StrongBull => "Strong Bull Market",
            Regime::ModerateBull => "Moderate Bull",
            Regime::Neutral => "Neutral / Transition",
            Regime::Defensive => "Defensive",
            Regime::HighRiskBear => "High Risk Bear Market",
        }
    }

    /// Suggested fraction of capital in equities.
    pub fn exposure(&self) -> ExposureRange {
        match self {
            Regime::StrongBull => ExposureRange::clamped(dec!(0.8), dec!(1)),
            Regime::ModerateBull => ExposureRange::clamped(dec!(0.6), dec!(0.8)),
            Regime::Neutral => ExposureRange::clamped(dec!(0.4), dec!(0.6)),
            Regime::Defensive => ExposureRange::clamped(dec!(0.2), dec!(0.4)),
            Regime::HighRiskBear => ExposureRange::clamped(dec!(0), dec!(0.2)),
        }
    }

    /// Whether `score` falls inside this regime's band.
    pub fn contains(&self, score: u8) -> bool {
        let upper = Regime::ALL
            .iter()
            .position(|r| r == self)
            .and_then(|i| i.checked_sub(1))
            .map(|i| Regime::ALL[i].threshold());

        score >= self.threshold() && upper.map_or(true, |upper| score < upper)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a score to its regime. Bands are checked top-down and the first
/// threshold the score reaches wins.
pub fn classify(score: u8) -> Regime {
    Regime::ALL
        .into_iter()
        .find(|regime| score >= regime.threshold())
        .unwrap_or(Regime::HighRiskBear)
}
