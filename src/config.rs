//! Runtime configuration.
//!
//! Defaults match the thresholds the engine has always used; every one of them can be
//! overridden through `KLINESIGHT_*` environment variables (see [`Config::from_env`]).

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::models::candle::Timeframe;

pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_BTC_SYMBOL: &str = "BTCUSDT";
/// Neutral band around a ma_20/ma_50 ratio of 1.
pub const DEFAULT_TREND_BAND: Decimal = dec!(0.01);

/// Get the deployment environment (`APP_ENV`), defaulting to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Thresholds enforced by the market data validator.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Neutral band around a ma_20/ma_50 ratio of 1. The indicator engine labels trends with
    /// it and the validator accepts any label inside it.
    pub trend_band: Decimal,
    /// Maximum relative distance between the latest 1h close and ma_20.
    pub max_price_ma_deviation: Decimal,
    pub max_moving_average: Decimal,
    pub max_age: Duration,
    pub max_future_skew: Duration,
    pub min_rows_daily: usize,
    pub min_rows_4h: usize,
    pub min_rows_1h: usize,
}

impl ValidationConfig {
    pub fn min_rows(&self, timeframe: Timeframe) -> usize {
        match timeframe {
            Timeframe::Daily => self.min_rows_daily,
            Timeframe::FourHour => self.min_rows_4h,
            Timeframe::OneHour => self.min_rows_1h,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            trend_band: DEFAULT_TREND_BAND,
            max_price_ma_deviation: dec!(0.5),
            max_moving_average: dec!(1000000),
            max_age: Duration::days(30),
            max_future_skew: Duration::hours(1),
            min_rows_daily: 30,
            min_rows_4h: 10,
            min_rows_1h: 10,
        }
    }
}

/// Periods and thresholds for the indicator engine.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub macd_threshold: Decimal,
    pub ma_short: usize,
    pub ma_long: usize,
    pub volume_window: usize,
    pub volume_high_ratio: Decimal,
    pub volume_low_ratio: Decimal,
    pub support_resistance_lookback: usize,
    pub correlation_min_periods: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_threshold: dec!(0.0001),
            ma_short: 20,
            ma_long: 50,
            volume_window: 24,
            volume_high_ratio: dec!(1.5),
            volume_low_ratio: dec!(0.5),
            support_resistance_lookback: 20,
            correlation_min_periods: 10,
        }
    }
}

/// Knobs for the candlestick narrative layer.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub max_key_candles: usize,
    pub level_tolerance: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_key_candles: 10,
            level_tolerance: dec!(0.01),
        }
    }
}

/// Exchange endpoint and per-timeframe fetch sizes.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub btc_symbol: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub limit_daily: usize,
    pub limit_4h: usize,
    pub limit_1h: usize,
}

impl ExchangeConfig {
    pub fn limit(&self, timeframe: Timeframe) -> usize {
        match timeframe {
            Timeframe::Daily => self.limit_daily,
            Timeframe::FourHour => self.limit_4h,
            Timeframe::OneHour => self.limit_1h,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
            btc_symbol: DEFAULT_BTC_SYMBOL.to_string(),
            timeout_secs: 10,
            max_retries: 3,
            limit_daily: Timeframe::Daily.default_limit(),
            limit_4h: Timeframe::FourHour.default_limit(),
            limit_1h: Timeframe::OneHour.default_limit(),
        }
    }
}

/// What the service does when an enhancement feature fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegradationPolicy {
    /// Replace the failed feature with its neutral placeholder and keep going.
    #[default]
    Degrade,
    /// Surface the failure to the caller.
    Propagate,
}

impl FromStr for DegradationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrade" => Ok(DegradationPolicy::Degrade),
            "propagate" => Ok(DegradationPolicy::Propagate),
            other => Err(format!(
                "unknown degradation policy '{}', expected 'degrade' or 'propagate'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub indicators: IndicatorConfig,
    pub analysis: AnalysisConfig,
    pub exchange: ExchangeConfig,
    pub degradation: DegradationPolicy,
}

impl Config {
    /// Build a config from defaults overridden by environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = env::var("BINANCE_BASE_URL") {
            config.exchange.base_url = url;
        }
        if let Ok(symbol) = env::var("KLINESIGHT_BTC_SYMBOL") {
            config.exchange.btc_symbol = symbol;
        }
        if let Some(timeout) = parse_env("KLINESIGHT_HTTP_TIMEOUT_SECS") {
            config.exchange.timeout_secs = timeout;
        }
        if let Some(retries) = parse_env("KLINESIGHT_MAX_RETRIES") {
            config.exchange.max_retries = retries;
        }
        if let Some(policy) = parse_env("KLINESIGHT_DEGRADATION") {
            config.degradation = policy;
        }
        if let Some(band) = parse_env("KLINESIGHT_TREND_BAND") {
            config.validation.trend_band = band;
        }
        if let Some(deviation) = parse_env("KLINESIGHT_MAX_PRICE_MA_DEVIATION") {
            config.validation.max_price_ma_deviation = deviation;
        }

        config
    }
}

fn parse_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring invalid configuration value");
            None
        }
    }
}
