//! Support and Resistance levels detection

use rust_decimal::Decimal;

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::SupportResistanceIndicator;

/// Calculate support and resistance levels
///
/// Support is the lowest low and resistance the highest high within the last
/// `lookback` candles. A window without a strictly positive range (flat market)
/// yields no levels.
pub fn calculate_support_resistance(
    candles: &[Candle],
    lookback: usize,
    current_price: Decimal,
) -> Option<SupportResistanceIndicator> {
    if lookback == 0 || candles.is_empty() {
        return None;
    }

    let recent_candles = &candles[candles.len().saturating_sub(lookback)..];

    let support = recent_candles.iter().map(|c| c.low).min()?;
    let resistance = recent_candles.iter().map(|c| c.high).max()?;

    if support <= Decimal::ZERO || support >= resistance {
        return Some(SupportResistanceIndicator {
            support_level: None,
            resistance_level: None,
            support_distance_pct: None,
            resistance_distance_pct: None,
        });
    }

    // Percent of the current price; positive when the level is on the expected side.
    let support_distance_pct =
        math::pct_change(current_price, support).map(|pct| (-pct).round_dp(2));
    let resistance_distance_pct =
        math::pct_change(current_price, resistance).map(|pct| pct.round_dp(2));

    Some(SupportResistanceIndicator {
        support_level: Some(support),
        resistance_level: Some(resistance),
        support_distance_pct,
        resistance_distance_pct,
    })
}

/// Calculate support/resistance with default lookback (20)
pub fn calculate_support_resistance_default(
    candles: &[Candle],
    current_price: Decimal,
) -> Option<SupportResistanceIndicator> {
    calculate_support_resistance(candles, 20, current_price)
}
