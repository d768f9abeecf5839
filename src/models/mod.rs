//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod market_data;

pub use candle::{Candle, CandleFrame, Timeframe};
pub use indicators::{
    IndicatorSnapshot, MaTrend, MacdIndicator, MacdSignal, SupportResistanceIndicator,
    VolumeProfile,
};
pub use market_data::{MarketDataInputs, MarketDataSet};
