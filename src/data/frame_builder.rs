//! Normalizes exchange kline rows into a [`CandleFrame`].

use serde_json::Value;
use tracing::debug;

use crate::data::parser::{parse_decimal, parse_open_time};
use crate::errors::ProcessingError;
use crate::models::candle::{Candle, CandleFrame, Timeframe};

/// One exchange kline row:
/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume, tradeCount,
/// takerBuyBase, takerBuyQuote, ignored]`.
pub type RawKline = Vec<Value>;

pub const KLINE_FIELD_COUNT: usize = 12;
/// Only open time and OHLCV are kept.
pub const KLINE_USED_FIELDS: usize = 6;

pub struct CandleFrameBuilder;

impl CandleFrameBuilder {
    pub fn build(timeframe: Timeframe, rows: &[RawKline]) -> Result<CandleFrame, ProcessingError> {
        let mut candles: Vec<Candle> = Vec::with_capacity(rows.len());

        for (row, fields) in rows.iter().enumerate() {
            if fields.len() < KLINE_USED_FIELDS {
                return Err(ProcessingError::invalid_data(
                    "build_candle_frame",
                    format!(
                        "{} row {} has {} fields, expected {}",
                        timeframe,
                        row,
                        fields.len(),
                        KLINE_FIELD_COUNT
                    ),
                ));
            }

            let timestamp = parse_open_time(&fields[0], row)?;
            if let Some(previous) = candles.last() {
                if timestamp < previous.timestamp {
                    return Err(ProcessingError::invalid_data(
                        "build_candle_frame",
                        format!(
                            "{} row {} open time {} precedes previous row {}",
                            timeframe, row, timestamp, previous.timestamp
                        ),
                    ));
                }
            }

            candles.push(Candle::new(
                parse_decimal(&fields[1], "open", row)?,
                parse_decimal(&fields[2], "high", row)?,
                parse_decimal(&fields[3], "low", row)?,
                parse_decimal(&fields[4], "close", row)?,
                parse_decimal(&fields[5], "volume", row)?,
                timestamp,
            ));
        }

        debug!(
            timeframe = %timeframe,
            rows = candles.len(),
            "Built {} candle frame with {} rows",
            timeframe,
            candles.len()
        );

        Ok(CandleFrame::new(timeframe, candles))
    }
}
