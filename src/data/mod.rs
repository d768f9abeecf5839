//! Raw exchange rows to typed candle frames.

pub mod frame_builder;
pub mod parser;

pub use frame_builder::{CandleFrameBuilder, RawKline, KLINE_FIELD_COUNT};
pub use parser::{parse_decimal, parse_decimal_str, parse_open_time};
