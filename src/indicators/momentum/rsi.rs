//! RSI (Relative Strength Index) indicator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::candle::Candle;

/// Returned when there is not enough data or the price did not move.
pub const RSI_NEUTRAL: Decimal = dec!(50);

/// Calculate RSI indicator
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss, both simple means over the last `period` changes.
///
/// Fewer than `period + 1` candles yields [`RSI_NEUTRAL`]. A window with only gains is
/// 100, only losses is 0, and no movement at all is 50.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Decimal {
    if period == 0 || candles.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let window = &candles[candles.len() - (period + 1)..];
    let mut gains = Decimal::ZERO;
    let mut losses = Decimal::ZERO;

    for pair in window.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > Decimal::ZERO {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let period_d = Decimal::from(period as u64);
    let avg_gain = gains / period_d;
    let avg_loss = losses / period_d;

    if avg_loss.is_zero() && avg_gain.is_zero() {
        return RSI_NEUTRAL;
    }
    if avg_loss.is_zero() {
        return Decimal::ONE_HUNDRED;
    }
    if avg_gain.is_zero() {
        return Decimal::ZERO;
    }

    let rs = avg_gain / avg_loss;
    let rsi = Decimal::ONE_HUNDRED - (Decimal::ONE_HUNDRED / (Decimal::ONE + rs));

    rsi.round_dp(2)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Decimal {
    calculate_rsi(candles, 14)
}
