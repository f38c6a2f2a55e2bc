//! Moving average indicators.
//!
//! Both indicators return values aligned with their input so that a
//! price at index `i` and its average at index `i` describe the same bar:
//! - Simple moving average (rolling mean)
//! - Exponential moving average with configurable seeding

pub mod moving_average;

pub use moving_average::{Ema, EmaSeed, Sma};
