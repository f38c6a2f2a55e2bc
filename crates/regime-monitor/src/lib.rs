//! Logging setup and TUI dashboard.

mod dashboard;
mod logging;

pub use dashboard::{Dashboard, DashboardState, KeyAction};
pub use logging::{setup_logging, LogOutput};
