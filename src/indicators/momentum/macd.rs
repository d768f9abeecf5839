//! MACD (Moving Average Convergence Divergence) indicator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::{MacdIndicator, MacdSignal};

/// Histogram magnitude below which the lines are considered crossed-over/flat.
pub const DEFAULT_SIGNAL_THRESHOLD: Decimal = dec!(0.0001);

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<MacdIndicator> {
    if fast_period == 0 || fast_period >= slow_period {
        return None;
    }
    if candles.len() < slow_period + signal_period {
        return None;
    }

    let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
    let fast_ema = math::ema_series(&closes, fast_period);
    let slow_ema = math::ema_series(&closes, slow_period);

    // fast_ema starts at close index fast-1, slow_ema at slow-1.
    let offset = slow_period - fast_period;
    let macd_values: Vec<Decimal> = slow_ema
        .iter()
        .enumerate()
        .filter_map(|(i, slow)| fast_ema.get(i + offset).map(|fast| *fast - *slow))
        .collect();

    let signal_ema = math::ema_series(&macd_values, signal_period);

    let macd = *macd_values.last()?;
    let signal = *signal_ema.last()?;

    Some(MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
        period: (fast_period, slow_period, signal_period),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<MacdIndicator> {
    calculate_macd(candles, 12, 26, 9)
}

/// Classify the MACD line against its signal line. Missing data is neutral.
pub fn classify_macd(macd: Option<&MacdIndicator>, threshold: Decimal) -> MacdSignal {
    match macd {
        Some(m) if m.histogram > threshold => MacdSignal::Bullish,
        Some(m) if m.histogram < -threshold => MacdSignal::Bearish,
        _ => MacdSignal::Neutral,
    }
}
