//! Trend indicators: moving averages

pub mod moving_average;

pub use moving_average::*;
