//! Simple moving averages and the trend they imply.

use rust_decimal::Decimal;

use crate::common::math;
use crate::errors::ProcessingError;
use crate::models::candle::Candle;
use crate::models::indicators::MaTrend;

/// Simple moving average of the last `period` closes.
pub fn simple_moving_average(candles: &[Candle], period: usize) -> Result<Decimal, ProcessingError> {
    if period == 0 || candles.len() < period {
        return Err(ProcessingError::insufficient_data(
            "moving_average",
            period,
            candles.len(),
            format!("MA({}) needs {} closes", period, period),
        ));
    }

    let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
    math::sma(&closes, period).ok_or_else(|| {
        ProcessingError::calculation("moving_average", format!("MA({}) overflowed", period))
    })
}

/// Trend from the short/long MA ratio: above `1 + band` is an uptrend, below
/// `1 - band` a downtrend, anything in between sideways.
pub fn classify_trend(ma_short: Decimal, ma_long: Decimal, band: Decimal) -> MaTrend {
    let Some(ratio) = ma_short.checked_div(ma_long) else {
        return MaTrend::Sideways;
    };

    if ratio > Decimal::ONE + band {
        MaTrend::Uptrend
    } else if ratio < Decimal::ONE - band {
        MaTrend::Downtrend
    } else {
        MaTrend::Sideways
    }
}
