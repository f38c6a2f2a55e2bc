//! Configuration structures.

use regime_core::error::RegimeError;
use regime_core::traits::FetchRequest;
use regime_core::types::{Lookback, Timeframe};
use regime_data::InstrumentSet;
use regime_score::{ScoreParams, DEFAULT_HISTORY_LEN};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub instruments: InstrumentSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub allocation: AllocationSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl AppConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), RegimeError> {
        self.scoring.validate()?;

        if self.allocation.default_capital.is_sign_negative() {
            return Err(RegimeError::Config(format!(
                "allocation.default_capital must not be negative, got {}",
                self.allocation.default_capital
            )));
        }
        if self.dashboard.refresh_secs == 0 {
            return Err(RegimeError::Config(
                "dashboard.refresh_secs must be positive".to_string(),
            ));
        }
        if self.data.provider == ProviderKind::Csv && self.data.csv_dir.is_none() {
            return Err(RegimeError::Config(
                "data.csv_dir is required for the csv provider".to_string(),
            ));
        }
        for (name, instrument) in [
            ("primary", &self.instruments.primary),
            ("secondary", &self.instruments.secondary),
            ("volatility", &self.instruments.volatility),
        ] {
            if instrument.symbol.trim().is_empty() {
                return Err(RegimeError::Config(format!(
                    "instruments.{}.symbol must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "regime-dashboard".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Whether JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Which market data source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub provider: ProviderKind,
    pub csv_dir: Option<PathBuf>,
    pub yahoo_base_url: String,
    pub cache_ttl_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            csv_dir: None,
            yahoo_base_url: regime_data::DEFAULT_BASE_URL.to_string(),
            cache_ttl_secs: 300,
        }
    }
}

impl DataSettings {
    /// Cache time-to-live.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// One instrument and how much history to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub lookback: Lookback,
}

impl InstrumentConfig {
    fn new(symbol: &str, lookback: Lookback) -> Self {
        Self {
            symbol: symbol.to_string(),
            lookback,
        }
    }
}

/// The three instruments feeding the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentSettings {
    pub primary: InstrumentConfig,
    pub secondary: InstrumentConfig,
    pub volatility: InstrumentConfig,
    pub interval: Timeframe,
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            primary: InstrumentConfig::new("^NSEI", Lookback::Years(2)),
            secondary: InstrumentConfig::new("^GSPC", Lookback::Years(1)),
            volatility: InstrumentConfig::new("^INDIAVIX", Lookback::Years(1)),
            interval: Timeframe::Daily,
        }
    }
}

impl InstrumentSettings {
    /// Fetch requests for one snapshot.
    pub fn requests(&self) -> InstrumentSet {
        let request = |instrument: &InstrumentConfig| {
            FetchRequest::new(instrument.symbol.clone(), instrument.lookback, self.interval)
        };
        InstrumentSet {
            primary: request(&self.primary),
            secondary: request(&self.secondary),
            volatility: request(&self.volatility),
        }
    }
}

/// Indicator windows and history length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub secondary_ma: usize,
    pub volatility_ma: usize,
    pub history_len: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let params = ScoreParams::default();
        Self {
            ema_fast: params.ema_fast,
            ema_slow: params.ema_slow,
            secondary_ma: params.secondary_ma,
            volatility_ma: params.volatility_ma,
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

impl ScoringSettings {
    /// Engine parameters.
    pub fn params(&self) -> ScoreParams {
        ScoreParams {
            ema_fast: self.ema_fast,
            ema_slow: self.ema_slow,
            secondary_ma: self.secondary_ma,
            volatility_ma: self.volatility_ma,
            ..ScoreParams::default()
        }
    }

    fn validate(&self) -> Result<(), RegimeError> {
        for (name, window) in [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("secondary_ma", self.secondary_ma),
            ("volatility_ma", self.volatility_ma),
            ("history_len", self.history_len),
        ] {
            if window == 0 {
                return Err(RegimeError::Config(format!(
                    "scoring.{} must be positive",
                    name
                )));
            }
        }
        if self.ema_fast >= self.ema_slow {
            return Err(RegimeError::Config(format!(
                "scoring.ema_fast ({}) must be shorter than scoring.ema_slow ({})",
                self.ema_fast, self.ema_slow
            )));
        }
        Ok(())
    }
}

/// Allocation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    pub default_capital: Decimal,
    pub currency_symbol: String,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            default_capital: dec!(1000000),
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Interactive dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub refresh_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self { refresh_secs: 300 }
    }
}

impl DashboardSettings {
    /// Auto refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let params = config.scoring.params();
        assert_eq!(params, ScoreParams::default());
        assert_eq!(config.scoring.history_len, 252);
        assert_eq!(config.instruments.requests(), InstrumentSet::default());
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.scoring.volatility_ma = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scoring.volatility_ma"));
    }

    #[test]
    fn test_rejects_inverted_emas() {
        let mut config = AppConfig::default();
        config.scoring.ema_fast = 200;
        config.scoring.ema_slow = 50;

        assert!(matches!(config.validate(), Err(RegimeError::Config(_))));
    }

    #[test]
    fn test_rejects_negative_capital() {
        let mut config = AppConfig::default();
        config.allocation.default_capital = dec!(-1);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_csv_provider_needs_directory() {
        let mut config = AppConfig::default();
        config.data.provider = ProviderKind::Csv;
        assert!(config.validate().is_err());

        config.data.csv_dir = Some(PathBuf::from("data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
        assert!(text.contains("lookback = \"2y\""));
        assert!(text.contains("interval = \"1d\""));
    }
}
