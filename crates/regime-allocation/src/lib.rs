//! Capital allocation for a suggested exposure range.
//!
//! Splits a capital amount into equity and cash bands. Arithmetic stays in
//! `Decimal` at full precision; rounding to whole currency units is only
//! applied by the display helpers.

mod allocator;
mod format;

pub use allocator::{allocate, parse_capital, Allocation, AllocationError};
pub use format::format_currency;
