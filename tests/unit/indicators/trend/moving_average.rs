//! Unit tests for moving averages and trend classification

use klinesight::errors::ProcessingErrorKind;
use klinesight::indicators::trend::{classify_trend, simple_moving_average};
use klinesight::models::MaTrend;
use rust_decimal_macros::dec;

use crate::fixtures::{candles_from_closes, linear_closes};

#[test]
fn test_sma_of_last_period() {
    let candles = candles_from_closes(&linear_closes(30, dec!(1), dec!(1)));
    // closes 11..=30
    assert_eq!(simple_moving_average(&candles, 20).unwrap(), dec!(20.5));
}

#[test]
fn test_sma_insufficient_data() {
    let candles = candles_from_closes(&linear_closes(30, dec!(1), dec!(1)));
    let err = simple_moving_average(&candles, 50).unwrap_err();
    assert_eq!(
        err.kind,
        ProcessingErrorKind::InsufficientData {
            required: 50,
            available: 30
        }
    );
}

#[test]
fn test_classify_trend_band() {
    let band = dec!(0.01);
    assert_eq!(classify_trend(dec!(102), dec!(100), band), MaTrend::Uptrend);
    assert_eq!(classify_trend(dec!(98), dec!(100), band), MaTrend::Downtrend);
    assert_eq!(classify_trend(dec!(100.5), dec!(100), band), MaTrend::Sideways);
    assert_eq!(classify_trend(dec!(101), dec!(100), band), MaTrend::Sideways);
}

#[test]
fn test_classify_trend_zero_long_average() {
    assert_eq!(classify_trend(dec!(5), dec!(0), dec!(0.01)), MaTrend::Sideways);
}
