//! Bar interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Interval between bars, spelled the way chart providers expect it.
///
/// Bars are keyed by calendar date, so intraday intervals are not
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1wk")]
    Weekly,
    /// Monthly bars
    #[serde(rename = "1mo")]
    Monthly,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1wk",
            Timeframe::Monthly => "1mo",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            "1w" | "1wk" | "week" | "weekly" => Ok(Timeframe::Weekly),
            "1mo" | "month" | "monthly" => Ok(Timeframe::Monthly),
            _ => Err(DataError::InvalidInterval(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::from_str("1d").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("daily").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("1wk").unwrap(), Timeframe::Weekly);
        assert_eq!(Timeframe::from_str("1MO").unwrap(), Timeframe::Monthly);
        assert!(Timeframe::from_str("3d").is_err());
    }

    #[test]
    fn test_timeframe_display() {
        assert_eq!(Timeframe::Daily.to_string(), "1d");
        assert_eq!(Timeframe::Weekly.to_string(), "1wk");
        assert_eq!(Timeframe::Monthly.to_string(), "1mo");
    }

    #[test]
    fn test_intraday_rejected() {
        assert!(matches!(
            Timeframe::from_str("1h"),
            Err(DataError::InvalidInterval(s)) if s == "1h"
        ));
        assert!(Timeframe::from_str("60m").is_err());
        assert!(serde_json::from_str::<Timeframe>("\"1h\"").is_err());
        assert_eq!(
            serde_json::from_str::<Timeframe>("\"1wk\"").unwrap(),
            Timeframe::Weekly
        );
    }
}
