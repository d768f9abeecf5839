//! Construction-time validation scenarios for the market data set

use chrono::Duration;
use klinesight::config::ValidationConfig;
use klinesight::errors::{FrameViolation, MarketDataError, ValidationError};
use klinesight::models::{CandleFrame, MaTrend, MarketDataInputs, MarketDataSet, Timeframe};
use klinesight::validation::MarketDataValidator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{fixed_now, valid_inputs};

fn build(inputs: MarketDataInputs) -> Result<MarketDataSet, ValidationError> {
    MarketDataSet::build_at(inputs, &ValidationConfig::default(), fixed_now())
}

fn frame_violation(err: &ValidationError) -> &FrameViolation {
    match err {
        ValidationError::Frame { violation, .. } => violation,
        other => panic!("expected a frame violation, got {other:?}"),
    }
}

#[test]
fn test_btc_uptrend_builds() {
    let data = build(valid_inputs("BTCUSDT")).unwrap();
    assert_eq!(data.symbol(), "BTCUSDT");
    assert_eq!(data.ma_trend(), MaTrend::Uptrend);
    assert!(data.rsi_14() >= dec!(50));
    assert_eq!(data.current_price(), dec!(300));
    assert_eq!(data.frame(Timeframe::Daily).len(), 180);
    assert_eq!(data.frame(Timeframe::FourHour).len(), 84);
    assert_eq!(data.frame(Timeframe::OneHour).len(), 60);
}

#[test]
fn test_support_above_resistance_is_rejected() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.support_level = Some(dec!(110));
    inputs.resistance_level = Some(dec!(105));

    let err = build(inputs).unwrap_err();
    assert!(err.to_string().contains("must be lower than resistance"));
}

#[test]
fn test_empty_frame_is_rejected() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.four_hour = CandleFrame::empty(Timeframe::FourHour);

    let err = build(inputs).unwrap_err();
    assert!(err.to_string().contains("cannot be empty"));
    assert_eq!(err.to_string(), "DataFrame '4h' cannot be empty");
}

#[test]
fn test_contradicting_trend_label_is_rejected() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.ma_trend = MaTrend::Downtrend;

    let err = build(inputs).unwrap_err();
    match &err {
        ValidationError::Field { field, .. } => assert_eq!(field, "ma_trend"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("expected uptrend"));
}

#[test]
fn test_any_label_inside_neutral_band() {
    for trend in [MaTrend::Uptrend, MaTrend::Downtrend, MaTrend::Sideways] {
        let mut inputs = valid_inputs("BTCUSDT");
        inputs.ma_50 = inputs.ma_20;
        inputs.ma_trend = trend;
        assert!(build(inputs).is_ok(), "{trend} should be accepted");
    }
}

#[test]
fn test_invalid_symbol_is_rejected_first() {
    let mut inputs = valid_inputs("btcusdt");
    inputs.four_hour = CandleFrame::empty(Timeframe::FourHour);

    let err = build(inputs).unwrap_err();
    assert!(matches!(err, ValidationError::Symbol { .. }));
    assert_eq!(MarketDataError::from(err).error_type(), "SymbolValidationError");
}

#[test]
fn test_stale_timestamp_is_rejected() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.timestamp = fixed_now() - Duration::days(31);

    let err = build(inputs).unwrap_err();
    assert!(matches!(err, ValidationError::Timestamp { .. }));
}

#[test]
fn test_future_timestamp_within_skew_is_accepted() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.timestamp = fixed_now() + Duration::minutes(30);
    assert!(build(inputs).is_ok());
}

#[test]
fn test_rsi_out_of_range() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.rsi_14 = dec!(150);
    let err = build(inputs).unwrap_err();
    assert_eq!(err.to_string(), "rsi_14 (150) must be between 0 and 100");
}

#[test]
fn test_correlation_out_of_range() {
    let mut inputs = valid_inputs("ETHUSDT");
    inputs.btc_correlation = Some(dec!(1.5));
    let err = build(inputs).unwrap_err();
    assert!(err.to_string().starts_with("btc_correlation (1.5)"));
}

#[test]
fn test_fear_greed_out_of_range() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.fear_greed_index = Some(101);
    assert!(build(inputs).unwrap_err().to_string().contains("fear_greed_index"));

    let mut inputs = valid_inputs("BTCUSDT");
    inputs.fear_greed_index = Some(55);
    assert_eq!(build(inputs).unwrap().fear_greed_index(), Some(55));
}

#[test]
fn test_non_positive_moving_average() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.ma_50 = Decimal::ZERO;
    let err = build(inputs).unwrap_err();
    assert!(err.to_string().starts_with("ma_50 (0) must be positive"));
}

#[test]
fn test_price_far_from_moving_average() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.ma_20 = dec!(100);
    inputs.ma_50 = dec!(100);

    let err = build(inputs).unwrap_err();
    match &err {
        ValidationError::Field { field, .. } => assert_eq!(field, "current_price"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_price_deviation_threshold_is_configurable() {
    let mut inputs = valid_inputs("BTCUSDT");
    inputs.ma_20 = dec!(100);
    inputs.ma_50 = dec!(100);

    let config = ValidationConfig {
        max_price_ma_deviation: dec!(3),
        ..ValidationConfig::default()
    };
    assert!(MarketDataSet::build_at(inputs, &config, fixed_now()).is_ok());
}

#[test]
fn test_too_few_daily_rows() {
    let mut inputs = valid_inputs("BTCUSDT");
    let candles = inputs.daily.candles()[160..].to_vec();
    inputs.daily = CandleFrame::new(Timeframe::Daily, candles);

    let err = build(inputs).unwrap_err();
    assert_eq!(
        frame_violation(&err),
        &FrameViolation::InsufficientRows {
            required: 30,
            available: 20
        }
    );
}

#[test]
fn test_hourly_frame_in_daily_slot_is_rejected() {
    let mut inputs = valid_inputs("BTCUSDT");
    let candles = inputs.one_hour.candles()[48..].to_vec();
    inputs.daily = CandleFrame::new(Timeframe::OneHour, candles);

    let err = build(inputs).unwrap_err();
    assert_eq!(
        frame_violation(&err),
        &FrameViolation::TimeframeMismatch {
            found: Timeframe::OneHour
        }
    );
    assert_eq!(err.to_string(), "DataFrame 'daily' holds 1h candles");
}

#[test]
fn test_slot_sets_row_minimum() {
    let inputs = valid_inputs("BTCUSDT");
    let candles = inputs.daily.candles()[168..].to_vec();
    let frame = CandleFrame::new(Timeframe::Daily, candles);
    let config = ValidationConfig::default();
    let validator = MarketDataValidator::new(&config);

    let err = validator.validate_slot(Timeframe::Daily, &frame).unwrap_err();
    assert_eq!(
        frame_violation(&err),
        &FrameViolation::InsufficientRows {
            required: 30,
            available: 12
        }
    );
    assert!(validator.validate_slot(Timeframe::OneHour, &frame).is_err());
}

#[test]
fn test_unordered_timestamps() {
    let mut inputs = valid_inputs("BTCUSDT");
    let mut candles = inputs.one_hour.candles().to_vec();
    candles.swap(10, 11);
    inputs.one_hour = CandleFrame::new(Timeframe::OneHour, candles);

    let err = build(inputs).unwrap_err();
    assert_eq!(
        frame_violation(&err),
        &FrameViolation::UnorderedTimestamps { row: 11 }
    );
}

#[test]
fn test_high_below_close() {
    let mut inputs = valid_inputs("BTCUSDT");
    let mut candles = inputs.four_hour.candles().to_vec();
    candles[5].high = candles[5].close - dec!(0.1);
    inputs.four_hour = CandleFrame::new(Timeframe::FourHour, candles);

    let err = build(inputs).unwrap_err();
    assert!(matches!(
        frame_violation(&err),
        FrameViolation::InvalidOhlc { row: 5, .. }
    ));
}

#[test]
fn test_negative_volume() {
    let mut inputs = valid_inputs("BTCUSDT");
    let mut candles = inputs.daily.candles().to_vec();
    candles[3].volume = dec!(-1);
    inputs.daily = CandleFrame::new(Timeframe::Daily, candles);

    let err = build(inputs).unwrap_err();
    assert!(matches!(
        frame_violation(&err),
        FrameViolation::NegativeVolume { row: 3, .. }
    ));
}

#[test]
fn test_non_positive_price() {
    let mut inputs = valid_inputs("BTCUSDT");
    let mut candles = inputs.daily.candles().to_vec();
    candles[0].low = Decimal::ZERO;
    inputs.daily = CandleFrame::new(Timeframe::Daily, candles);

    let err = build(inputs).unwrap_err();
    assert!(matches!(
        frame_violation(&err),
        FrameViolation::InvalidNumeric { row: 0, column: "low", .. }
    ));
}
