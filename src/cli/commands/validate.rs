//! Validate configuration command.

use anyhow::Result;
use regime_config::{load_config, DEFAULT_CONFIG_PATH};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let shown = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    println!("Validating configuration: {:?}", shown);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Data provider: {:?}", config.data.provider);
    println!(
        "Instruments: {} ({}), {} ({}), {} ({}) at {}",
        config.instruments.primary.symbol,
        config.instruments.primary.lookback,
        config.instruments.secondary.symbol,
        config.instruments.secondary.lookback,
        config.instruments.volatility.symbol,
        config.instruments.volatility.lookback,
        config.instruments.interval
    );
    println!(
        "Windows: EMA {}/{}, secondary MA {}, volatility MA {}",
        config.scoring.ema_fast,
        config.scoring.ema_slow,
        config.scoring.secondary_ma,
        config.scoring.volatility_ma
    );
    println!("History length: {}", config.scoring.history_len);
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
