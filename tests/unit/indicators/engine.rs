//! Unit tests for the indicator engine

use klinesight::config::{IndicatorConfig, DEFAULT_TREND_BAND};
use klinesight::errors::ProcessingErrorKind;
use klinesight::indicators::IndicatorEngine;
use klinesight::models::{CandleFrame, MaTrend, Timeframe, VolumeProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{candles_ending_at, fixed_now, uptrend_frames};

#[test]
fn test_uptrend_snapshot() {
    let [daily, _, hourly] = uptrend_frames(dec!(300));
    let snapshot = IndicatorEngine::default().compute(&daily, &hourly).unwrap();

    assert_eq!(snapshot.rsi_14, Decimal::ONE_HUNDRED);
    assert_eq!(snapshot.ma_20, dec!(290.5));
    assert_eq!(snapshot.ma_50, dec!(275.5));
    assert_eq!(snapshot.ma_trend, MaTrend::Uptrend);
    assert_eq!(snapshot.volume_profile, VolumeProfile::Normal);
    assert_eq!(snapshot.support_level, Some(dec!(279.5)));
    assert_eq!(snapshot.resistance_level, Some(dec!(301)));
    assert!(snapshot.macd.is_some());
}

#[test]
fn test_short_daily_frame_fails_moving_average() {
    let daily = CandleFrame::new(
        Timeframe::Daily,
        candles_ending_at(Timeframe::Daily, 30, dec!(300), dec!(1), fixed_now()),
    );
    let [_, _, hourly] = uptrend_frames(dec!(300));

    let err = IndicatorEngine::default().compute(&daily, &hourly).unwrap_err();
    assert_eq!(
        err.kind,
        ProcessingErrorKind::InsufficientData {
            required: 50,
            available: 30
        }
    );
    assert!(err.feature.is_none());
}

#[test]
fn test_supplied_volume_profile_is_kept() {
    let [daily, _, hourly] = uptrend_frames(dec!(300));
    let snapshot = IndicatorEngine::default()
        .compute_with_volume(&daily, &hourly, VolumeProfile::Low)
        .unwrap();
    assert_eq!(snapshot.volume_profile, VolumeProfile::Low);
}

#[test]
fn test_custom_periods() {
    let config = IndicatorConfig {
        ma_short: 5,
        ma_long: 10,
        ..IndicatorConfig::default()
    };
    let engine = IndicatorEngine::new(config, DEFAULT_TREND_BAND);
    let [daily, _, _] = uptrend_frames(dec!(300));

    let (ma_short, ma_long, trend) = engine.moving_averages(&daily).unwrap();
    assert_eq!(ma_short, dec!(298));
    assert_eq!(ma_long, dec!(295.5));
    // 298 / 295.5 is inside the 1% band
    assert_eq!(trend, MaTrend::Sideways);
}

#[test]
fn test_trend_band_is_passed_in() {
    let [daily, _, _] = uptrend_frames(dec!(300));
    let engine = IndicatorEngine::new(IndicatorConfig::default(), dec!(0.1));

    // 290.5 / 275.5 is about 1.054, inside a 10% band
    let (_, _, trend) = engine.moving_averages(&daily).unwrap();
    assert_eq!(trend, MaTrend::Sideways);
}
