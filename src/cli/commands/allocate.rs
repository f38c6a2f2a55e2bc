//! Allocate command implementation.

use anyhow::Result;
use regime_allocation::{allocate, format_currency};
use regime_config::AppConfig;
use regime_score::classify;

use crate::cli::AllocateArgs;

pub async fn run(args: AllocateArgs, config: &AppConfig) -> Result<()> {
    let regime = classify(args.score);
    let exposure = regime.exposure();
    let allocation = allocate(args.capital, exposure)?;
    let money = |v| format_currency(v, &config.allocation.currency_symbol);

    println!("Institutional Score: {} / 100", args.score);
    println!("Market Regime:       {}", regime);
    println!("Suggested Exposure:  {}", exposure);
    println!();
    println!("Capital:             {}", money(allocation.capital));
    println!(
        "Equity:              {} - {}",
        money(allocation.equity_min),
        money(allocation.equity_max)
    );
    println!(
        "Cash:                {} - {}",
        money(allocation.cash_min),
        money(allocation.cash_max)
    );

    Ok(())
}
