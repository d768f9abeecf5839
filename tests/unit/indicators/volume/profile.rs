//! Unit tests for volume profile

use klinesight::indicators::volume::calculate_volume_profile;
use klinesight::models::{Candle, VolumeProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{candles_from_closes, linear_closes};

fn with_volumes(preceding: Decimal, recent: Decimal, window: usize) -> Vec<Candle> {
    let mut candles = candles_from_closes(&linear_closes(window * 2, dec!(100), dec!(0.1)));
    for (i, candle) in candles.iter_mut().enumerate() {
        candle.volume = if i < window { preceding } else { recent };
    }
    candles
}

fn profile(candles: &[Candle]) -> VolumeProfile {
    calculate_volume_profile(candles, 24, dec!(1.5), dec!(0.5)).unwrap()
}

#[test]
fn test_volume_spike_is_high() {
    assert_eq!(profile(&with_volumes(dec!(100), dec!(200), 24)), VolumeProfile::High);
}

#[test]
fn test_volume_drought_is_low() {
    assert_eq!(profile(&with_volumes(dec!(100), dec!(40), 24)), VolumeProfile::Low);
}

#[test]
fn test_steady_volume_is_normal() {
    assert_eq!(profile(&with_volumes(dec!(100), dec!(120), 24)), VolumeProfile::Normal);
}

#[test]
fn test_short_series_is_normal() {
    let candles = candles_from_closes(&linear_closes(10, dec!(100), dec!(1)));
    assert_eq!(profile(&candles), VolumeProfile::Normal);
}

#[test]
fn test_volume_after_silence_is_high() {
    assert_eq!(profile(&with_volumes(dec!(0), dec!(5), 24)), VolumeProfile::High);
}

#[test]
fn test_all_zero_volume_is_normal() {
    assert_eq!(profile(&with_volumes(dec!(0), dec!(0), 24)), VolumeProfile::Normal);
}
