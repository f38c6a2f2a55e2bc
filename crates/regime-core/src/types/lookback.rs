//! Lookback periods such as `6mo`, `1y` or `2y`.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// How far back a fetch reaches from the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lookback {
    Days(u32),
    Months(u32),
    Years(u32),
}

impl Lookback {
    /// First date covered by the window ending at `end`.
    ///
    /// Month arithmetic clamps to the last valid day of the month.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        let start = match *self {
            Lookback::Days(n) => end.checked_sub_days(chrono::Days::new(u64::from(n))),
            Lookback::Months(n) => end.checked_sub_months(Months::new(n)),
            Lookback::Years(n) => end.checked_sub_months(Months::new(n.saturating_mul(12))),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::Days(n) => write!(f, "{}d", n),
            Lookback::Months(n) => write!(f, "{}mo", n),
            Lookback::Years(n) => write!(f, "{}y", n),
        }
    }
}

impl FromStr for Lookback {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DataError::InvalidLookback(s.to_string()))?;
        let (count, unit) = trimmed.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| DataError::InvalidLookback(s.to_string()))?;
        if count == 0 {
            return Err(DataError::InvalidLookback(s.to_string()));
        }

        match unit {
            "d" => Ok(Lookback::Days(count)),
            "mo" => Ok(Lookback::Months(count)),
            "y" => Ok(Lookback::Years(count)),
            _ => Err(DataError::InvalidLookback(s.to_string())),
        }
    }
}

impl TryFrom<String> for Lookback {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.to_string()
    }
}
