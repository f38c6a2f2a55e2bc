//! Market data providers for the regime dashboard.
//!
//! - `CsvProvider`: one CSV file per symbol in a directory
//! - `YahooProvider`: the public chart endpoint over HTTP
//! - `CachedProvider`: wraps any provider with a time-to-live cache
//! - `MarketSnapshot`: the three series of one pipeline run

mod cache;
mod csv_provider;
mod snapshot;
mod yahoo;

pub use cache::{CacheKey, CachedProvider, TtlCache};
pub use csv_provider::CsvProvider;
pub use snapshot::{InstrumentSet, MarketSnapshot};
pub use yahoo::{YahooProvider, DEFAULT_BASE_URL};
