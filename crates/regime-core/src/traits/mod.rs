//! Core traits for the regime dashboard.

mod data_provider;
mod indicator;

pub use data_provider::{FetchRequest, MarketDataProvider};
pub use indicator::Indicator;
