//! Core data types for the regime dashboard.

mod bar;
mod exposure;
mod lookback;
mod series;
mod timeframe;

pub use bar::Bar;
pub use exposure::ExposureRange;
pub use lookback::Lookback;
pub use series::PriceSeries;
pub use timeframe::Timeframe;
