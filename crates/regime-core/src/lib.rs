//! Core types and traits for the market regime dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Timeframe, Lookback)
//! - Exposure ranges shared by the regime classifier and the allocator
//! - The market data provider contract and fetch requests
//! - The indicator trait shared by the moving averages

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, IndicatorError, RegimeError};
pub use traits::*;
pub use types::*;
