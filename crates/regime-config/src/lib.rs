//! Configuration management.

mod settings;

pub use settings::{
    AllocationSettings, AppConfig, AppSettings, DashboardSettings, DataSettings,
    InstrumentConfig, InstrumentSettings, LoggingConfig, ProviderKind, ScoringSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable prefix, e.g. `REGIME__SCORING__EMA_FAST=20`.
pub const ENV_PREFIX: &str = "REGIME";

/// Load configuration from file and environment.
///
/// An explicit `path` must exist. Without one the default file is used if
/// present and built-in defaults fill every missing value.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regime_core::types::Lookback;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regime.toml");
        fs::write(
            &path,
            r#"
[instruments.volatility]
symbol = "^VIX"
lookback = "6mo"

[scoring]
ema_fast = 20
ema_slow = 100
secondary_ma = 50
volatility_ma = 20
history_len = 120

[allocation]
default_capital = 2500000
currency_symbol = "$"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.instruments.volatility.symbol, "^VIX");
        assert_eq!(config.instruments.volatility.lookback, Lookback::Months(6));
        assert_eq!(config.instruments.primary.symbol, "^NSEI");
        assert_eq!(config.scoring.params().ema_fast, 20);
        assert_eq!(config.scoring.history_len, 120);
        assert_eq!(config.allocation.default_capital, dec!(2500000));
        assert_eq!(config.allocation.currency_symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_bad_lookback_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[instruments.primary]\nsymbol = \"^NSEI\"\nlookback = \"0y\"\n",
        )
        .unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_intraday_interval_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hourly.toml");
        fs::write(&path, "[instruments]\ninterval = \"1h\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_environment_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regime.toml");
        fs::write(&path, "[dashboard]\nrefresh_secs = 60\n").unwrap();

        std::env::set_var("REGIME__DASHBOARD__REFRESH_SECS", "15");
        let config = load_config(Some(&path));
        std::env::remove_var("REGIME__DASHBOARD__REFRESH_SECS");

        assert_eq!(config.unwrap().dashboard.refresh_secs, 15);
    }
}
