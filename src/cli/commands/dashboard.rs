//! Dashboard command implementation.

use anyhow::Result;
use regime_config::AppConfig;
use regime_monitor::{Dashboard, DashboardState};
use tokio::runtime::Handle;
use tracing::info;

use super::{build_provider, fetch_report};
use crate::cli::DashboardArgs;

pub async fn run(args: DashboardArgs, config: &AppConfig) -> Result<()> {
    let provider = build_provider(config, args.data.as_deref())?;
    let capital = args.capital.unwrap_or(config.allocation.default_capital);

    let mut state = DashboardState::new(capital, config.allocation.currency_symbol.as_str());
    let dashboard = Dashboard::new(config.dashboard.refresh_interval());
    let handle = Handle::current();

    // The terminal loop is blocking; each refresh re-enters the runtime.
    tokio::task::block_in_place(|| {
        dashboard.run(&mut state, || {
            handle.block_on(fetch_report(provider.as_ref(), config))
        })
    })?;

    info!("Dashboard closed");
    Ok(())
}
