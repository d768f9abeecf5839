//! Binance spot REST kline source.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ExchangeConfig;
use crate::data::RawKline;
use crate::errors::{NetworkError, NetworkErrorKind};
use crate::models::candle::Timeframe;
use crate::services::market_data::KlineSource;

pub const KLINES_PATH: &str = "/api/v3/klines";

const MIN_RETRY_DELAY: Duration = Duration::from_millis(200);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct BinanceKlineSource {
    client: Client,
    base_url: String,
    max_retries: usize,
}

impl BinanceKlineSource {
    pub fn new(config: &ExchangeConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                NetworkError::new(NetworkErrorKind::Connectivity, &config.base_url, e.to_string())
            })?;

        Ok(Self::with_client(config.base_url.clone(), client).with_max_retries(config.max_retries))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 0,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, KLINES_PATH)
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<RawKline>, NetworkError> {
        let endpoint = self.endpoint();
        let limit = limit.to_string();

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
            return Err(NetworkError::new(
                NetworkErrorKind::RateLimited,
                &endpoint,
                format!("exchange rate limit hit ({})", status),
            )
            .with_status(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::new(
                NetworkErrorKind::BadResponse,
                &endpoint,
                error_message(status, &body),
            )
            .with_status(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::new(NetworkErrorKind::Timeout, &endpoint, e.to_string())
            } else {
                NetworkError::new(
                    NetworkErrorKind::BadResponse,
                    &endpoint,
                    format!("response is not valid JSON: {}", e),
                )
            }
        })?;

        parse_rows(&endpoint, body)
    }
}

#[async_trait]
impl KlineSource for BinanceKlineSource {
    async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<RawKline>, NetworkError> {
        let interval = timeframe.interval();
        let backoff = ExponentialBuilder::default()
            .with_min_delay(MIN_RETRY_DELAY)
            .with_max_delay(MAX_RETRY_DELAY)
            .with_max_times(self.max_retries)
            .with_jitter();

        let rows = (|| self.fetch_once(symbol, interval, limit))
            .retry(backoff)
            .when(|e: &NetworkError| e.is_retryable())
            .notify(|e: &NetworkError, delay: Duration| {
                warn!(
                    symbol,
                    interval,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "Kline request failed, retrying"
                );
            })
            .await?;

        debug!(symbol, interval, rows = rows.len(), "Fetched klines");
        Ok(rows)
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> NetworkError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else {
        NetworkErrorKind::Connectivity
    };
    NetworkError::new(kind, endpoint, err.to_string())
}

/// Prefer the exchange's `msg` field when the error body carries one.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("msg").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());
    format!("HTTP {}: {}", status.as_u16(), detail)
}

/// The body must be a JSON array of arrays.
fn parse_rows(endpoint: &str, body: Value) -> Result<Vec<RawKline>, NetworkError> {
    let Value::Array(rows) = body else {
        return Err(NetworkError::new(
            NetworkErrorKind::BadResponse,
            endpoint,
            "expected a JSON array of klines",
        ));
    };

    rows.into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Value::Array(fields) => Ok(fields),
            other => Err(NetworkError::new(
                NetworkErrorKind::BadResponse,
                endpoint,
                format!("kline row {} is not an array: {}", row, other),
            )),
        })
        .collect()
}
