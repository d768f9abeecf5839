//! Input and result validation.

pub mod market_data;
pub mod symbol;

pub use market_data::MarketDataValidator;
pub use symbol::{validate_symbol, SymbolValidator};
