//! Unit tests for symbol validation

use klinesight::errors::{ValidationError, SYMBOL_FORMAT};
use klinesight::validation::{validate_symbol, SymbolValidator};

fn reason(symbol: &str) -> String {
    match validate_symbol(symbol) {
        Err(ValidationError::Symbol { reason, .. }) => reason,
        other => panic!("expected symbol error for {symbol:?}, got {other:?}"),
    }
}

#[test]
fn test_accepts_usdt_pairs() {
    for symbol in ["BTCUSDT", "ETHUSDT", "OPUSDT", "PEPEUSDT", "ABCDEFUSDT"] {
        assert!(SymbolValidator::validate(symbol).is_ok(), "{symbol} should be valid");
    }
}

#[test]
fn test_rejects_malformed_symbols() {
    for symbol in [
        "",
        "BTC",
        "BTCUSD",
        "btcusdt",
        "BUSDT",
        "ABCDEFGUSDT",
        "USDTUSDT",
        "BT1USDT",
        "BTC-USDT",
    ] {
        assert!(validate_symbol(symbol).is_err(), "{symbol:?} should be rejected");
    }
}

#[test]
fn test_error_names_expected_format() {
    let err = validate_symbol("ethusdt").unwrap_err();
    assert!(err.to_string().contains("'ethusdt'"));
    assert!(err.to_string().ends_with(SYMBOL_FORMAT));
}

#[test]
fn test_empty_symbol_reason() {
    assert!(reason("").contains("empty"));
}

#[test]
fn test_missing_quote_reason() {
    assert!(reason("BTCEUR").contains("USDT"));
}
