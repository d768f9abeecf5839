//! Unit tests for support and resistance levels

use klinesight::indicators::structure::{
    calculate_support_resistance, calculate_support_resistance_default,
};
use klinesight::models::Candle;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bar(high: Decimal, low: Decimal) -> Candle {
    let mid = (high + low) / dec!(2);
    Candle::new(mid, high, low, mid, dec!(10), Utc::now())
}

#[test]
fn test_levels_are_window_extremes() {
    let candles = vec![
        bar(dec!(150), dec!(50)),
        bar(dec!(108), dec!(95)),
        bar(dec!(110), dec!(90)),
        bar(dec!(105), dec!(97)),
    ];
    let levels = calculate_support_resistance(&candles, 3, dec!(100)).unwrap();
    assert_eq!(levels.support_level, Some(dec!(90)));
    assert_eq!(levels.resistance_level, Some(dec!(110)));
    assert_eq!(levels.support_distance_pct, Some(dec!(10)));
    assert_eq!(levels.resistance_distance_pct, Some(dec!(10)));
}

#[test]
fn test_default_lookback_covers_twenty_candles() {
    let mut candles: Vec<Candle> = (0..25).map(|_| bar(dec!(101), dec!(99))).collect();
    candles[2] = bar(dec!(500), dec!(1));
    let levels = calculate_support_resistance_default(&candles, dec!(100)).unwrap();
    assert_eq!(levels.support_level, Some(dec!(99)));
    assert_eq!(levels.resistance_level, Some(dec!(101)));
}

#[test]
fn test_flat_market_has_no_levels() {
    let candles: Vec<Candle> = (0..5).map(|_| bar(dec!(100), dec!(100))).collect();
    let levels = calculate_support_resistance(&candles, 20, dec!(100)).unwrap();
    assert!(levels.support_level.is_none());
    assert!(levels.resistance_level.is_none());
}

#[test]
fn test_empty_input() {
    assert!(calculate_support_resistance(&[], 20, dec!(100)).is_none());
}
