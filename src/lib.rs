//! Klinesight
//!
//! Validated multi-timeframe candlestick data, technical indicators and
//! candlestick narratives for USDT spot pairs.

pub mod analysis;
pub mod common;
pub mod config;
pub mod data;
pub mod errors;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
pub mod validation;

pub use errors::MarketDataError;
pub use models::{MarketDataInputs, MarketDataSet};
pub use services::MarketDataService;
