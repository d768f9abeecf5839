pub mod aggregator;
pub mod binance;
pub mod market_data;

pub use aggregator::MarketDataService;
pub use binance::BinanceKlineSource;
pub use market_data::{InMemoryKlineSource, KlineSource};
