//! The validated multi-timeframe aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::ValidationConfig;
use crate::errors::ValidationError;
use crate::models::candle::{CandleFrame, Timeframe};
use crate::models::indicators::{IndicatorSnapshot, MaTrend, MacdSignal, VolumeProfile};
use crate::validation::MarketDataValidator;

/// Unvalidated parts of a [`MarketDataSet`].
///
/// This is the first phase of construction: fill it in, then hand it to
/// [`MarketDataSet::build`], which either returns a fully valid set or the first
/// violated rule.
#[derive(Debug, Clone)]
pub struct MarketDataInputs {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub daily: CandleFrame,
    pub four_hour: CandleFrame,
    pub one_hour: CandleFrame,
    pub rsi_14: Decimal,
    pub macd_signal: MacdSignal,
    pub ma_20: Decimal,
    pub ma_50: Decimal,
    pub ma_trend: MaTrend,
    pub btc_correlation: Option<Decimal>,
    pub fear_greed_index: Option<u8>,
    pub volume_profile: VolumeProfile,
    pub support_level: Option<Decimal>,
    pub resistance_level: Option<Decimal>,
}

impl MarketDataInputs {
    /// Assemble inputs from fetched frames and the indicators computed over them.
    pub fn from_indicators(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        frames: [CandleFrame; 3],
        indicators: IndicatorSnapshot,
    ) -> Self {
        let [daily, four_hour, one_hour] = frames;
        Self {
            symbol: symbol.into(),
            timestamp,
            daily,
            four_hour,
            one_hour,
            rsi_14: indicators.rsi_14,
            macd_signal: indicators.macd_signal,
            ma_20: indicators.ma_20,
            ma_50: indicators.ma_50,
            ma_trend: indicators.ma_trend,
            btc_correlation: None,
            fear_greed_index: None,
            volume_profile: indicators.volume_profile,
            support_level: indicators.support_level,
            resistance_level: indicators.resistance_level,
        }
    }

    pub fn frame(&self, timeframe: Timeframe) -> &CandleFrame {
        match timeframe {
            Timeframe::Daily => &self.daily,
            Timeframe::FourHour => &self.four_hour,
            Timeframe::OneHour => &self.one_hour,
        }
    }
}

/// Validated market data for one symbol. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct MarketDataSet {
    symbol: String,
    timestamp: DateTime<Utc>,
    daily: CandleFrame,
    four_hour: CandleFrame,
    one_hour: CandleFrame,
    rsi_14: Decimal,
    macd_signal: MacdSignal,
    ma_20: Decimal,
    ma_50: Decimal,
    ma_trend: MaTrend,
    btc_correlation: Option<Decimal>,
    fear_greed_index: Option<u8>,
    volume_profile: VolumeProfile,
    support_level: Option<Decimal>,
    resistance_level: Option<Decimal>,
}

impl MarketDataSet {
    pub fn build(
        inputs: MarketDataInputs,
        config: &ValidationConfig,
    ) -> Result<Self, ValidationError> {
        Self::build_at(inputs, config, Utc::now())
    }

    /// Like [`MarketDataSet::build`] with an explicit "now" for the timestamp window.
    pub fn build_at(
        inputs: MarketDataInputs,
        config: &ValidationConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        MarketDataValidator::new(config).validate(&inputs, now)?;

        let MarketDataInputs {
            symbol,
            timestamp,
            daily,
            four_hour,
            one_hour,
            rsi_14,
            macd_signal,
            ma_20,
            ma_50,
            ma_trend,
            btc_correlation,
            fear_greed_index,
            volume_profile,
            support_level,
            resistance_level,
        } = inputs;

        Ok(Self {
            symbol,
            timestamp,
            daily,
            four_hour,
            one_hour,
            rsi_14,
            macd_signal,
            ma_20,
            ma_50,
            ma_trend,
            btc_correlation,
            fear_greed_index,
            volume_profile,
            support_level,
            resistance_level,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn frame(&self, timeframe: Timeframe) -> &CandleFrame {
        match timeframe {
            Timeframe::Daily => &self.daily,
            Timeframe::FourHour => &self.four_hour,
            Timeframe::OneHour => &self.one_hour,
        }
    }

    pub fn rsi_14(&self) -> Decimal {
        self.rsi_14
    }

    pub fn macd_signal(&self) -> MacdSignal {
        self.macd_signal
    }

    pub fn ma_20(&self) -> Decimal {
        self.ma_20
    }

    pub fn ma_50(&self) -> Decimal {
        self.ma_50
    }

    pub fn ma_trend(&self) -> MaTrend {
        self.ma_trend
    }

    pub fn btc_correlation(&self) -> Option<Decimal> {
        self.btc_correlation
    }

    pub fn fear_greed_index(&self) -> Option<u8> {
        self.fear_greed_index
    }

    pub fn volume_profile(&self) -> VolumeProfile {
        self.volume_profile
    }

    pub fn support_level(&self) -> Option<Decimal> {
        self.support_level
    }

    pub fn resistance_level(&self) -> Option<Decimal> {
        self.resistance_level
    }

    /// Latest close of the shortest timeframe. Always present on a built set.
    pub fn current_price(&self) -> Decimal {
        self.one_hour
            .last()
            .map(|c| c.close)
            .unwrap_or(Decimal::ZERO)
    }
}
