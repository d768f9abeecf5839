//! Integration tests for the Binance kline source against a mocked exchange.

use klinesight::config::ExchangeConfig;
use klinesight::errors::NetworkErrorKind;
use klinesight::models::Timeframe;
use klinesight::services::{BinanceKlineSource, KlineSource};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::{candles_ending_at, fixed_now};
use crate::test_utils::{binance_source, mock_klines};
use rust_decimal_macros::dec;

#[tokio::test]
async fn fetch_klines_sends_symbol_interval_and_limit() {
    let server = MockServer::start().await;
    let candles = candles_ending_at(Timeframe::FourHour, 84, dec!(2500), dec!(2), fixed_now());

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("interval", "4h"))
        .and(query_param("limit", "84"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(crate::fixtures::raw_klines(&candles)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = binance_source(&server, 0)
        .fetch_klines("ETHUSDT", Timeframe::FourHour, 84)
        .await
        .expect("klines");
    assert_eq!(rows.len(), 84);
    assert_eq!(rows[83][4], json!("2500"));
}

#[tokio::test]
async fn rate_limit_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = binance_source(&server, 2)
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::RateLimited);
    assert_eq!(err.status, Some(429));
}

#[tokio::test]
async fn ip_ban_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let err = binance_source(&server, 0)
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::RateLimited);
}

#[tokio::test]
async fn rejected_symbol_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = binance_source(&server, 3)
        .fetch_klines("ZZZUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::BadResponse);
    assert_eq!(err.status, Some(400));
    assert!(err.message.contains("Invalid symbol."));
}

#[tokio::test]
async fn server_error_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    let candles = candles_ending_at(Timeframe::OneHour, 60, dec!(300), dec!(0.1), fixed_now());
    mock_klines(&server, "BTCUSDT", Timeframe::OneHour, &candles).await;

    let rows = binance_source(&server, 2)
        .fetch_klines("BTCUSDT", Timeframe::OneHour, 60)
        .await
        .expect("second attempt succeeds");
    assert_eq!(rows.len(), 60);
}

#[tokio::test]
async fn non_array_body_is_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"klines": []})))
        .mount(&server)
        .await;

    let err = binance_source(&server, 0)
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::BadResponse);
}

#[tokio::test]
async fn invalid_json_is_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = binance_source(&server, 0)
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::BadResponse);
}

#[tokio::test]
async fn slow_exchange_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ExchangeConfig {
        base_url: server.uri(),
        timeout_secs: 1,
        max_retries: 0,
        ..ExchangeConfig::default()
    };
    let err = BinanceKlineSource::new(&config)
        .expect("client")
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::Timeout);
}

#[tokio::test]
async fn unreachable_exchange_is_connectivity_failure() {
    let config = ExchangeConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        max_retries: 0,
        ..ExchangeConfig::default()
    };
    let err = BinanceKlineSource::new(&config)
        .expect("client")
        .fetch_klines("BTCUSDT", Timeframe::Daily, 180)
        .await
        .unwrap_err();
    assert_eq!(err.kind, NetworkErrorKind::Connectivity);
    assert!(err.is_retryable());
}
