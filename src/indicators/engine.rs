//! Computes the full indicator snapshot for a market data set.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{Config, IndicatorConfig, DEFAULT_TREND_BAND};
use crate::errors::ProcessingError;
use crate::indicators::correlation::calculate_btc_correlation;
use crate::indicators::momentum::{calculate_macd, calculate_rsi, classify_macd};
use crate::indicators::structure::calculate_support_resistance;
use crate::indicators::trend::{classify_trend, simple_moving_average};
use crate::indicators::volume::calculate_volume_profile;
use crate::models::candle::CandleFrame;
use crate::models::indicators::{
    IndicatorSnapshot, MaTrend, MacdSignal, SupportResistanceIndicator, VolumeProfile,
};

/// Momentum, trend and structure come from the daily frame; volume profile and the
/// current price from the hourly frame.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
    trend_band: Decimal,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default(), DEFAULT_TREND_BAND)
    }
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig, trend_band: Decimal) -> Self {
        Self { config, trend_band }
    }

    /// Engine whose trend labels use the validator's band.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.indicators.clone(), config.validation.trend_band)
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn rsi(&self, frame: &CandleFrame) -> Decimal {
        calculate_rsi(frame.candles(), self.config.rsi_period)
    }

    pub fn macd_signal(&self, frame: &CandleFrame) -> MacdSignal {
        let macd = calculate_macd(
            frame.candles(),
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        );
        classify_macd(macd.as_ref(), self.config.macd_threshold)
    }

    /// Returns `(ma_short, ma_long, trend)`.
    pub fn moving_averages(
        &self,
        frame: &CandleFrame,
    ) -> Result<(Decimal, Decimal, MaTrend), ProcessingError> {
        let ma_short = simple_moving_average(frame.candles(), self.config.ma_short)?;
        let ma_long = simple_moving_average(frame.candles(), self.config.ma_long)?;
        let trend = classify_trend(ma_short, ma_long, self.trend_band);
        Ok((ma_short, ma_long, trend))
    }

    pub fn volume_profile(&self, frame: &CandleFrame) -> Result<VolumeProfile, ProcessingError> {
        calculate_volume_profile(
            frame.candles(),
            self.config.volume_window,
            self.config.volume_high_ratio,
            self.config.volume_low_ratio,
        )
    }

    pub fn support_resistance(
        &self,
        frame: &CandleFrame,
        current_price: Decimal,
    ) -> Option<SupportResistanceIndicator> {
        calculate_support_resistance(
            frame.candles(),
            self.config.support_resistance_lookback,
            current_price,
        )
    }

    pub fn btc_correlation(
        &self,
        symbol: &str,
        frame: &CandleFrame,
        btc_symbol: &str,
        btc_frame: &CandleFrame,
    ) -> Result<Option<Decimal>, ProcessingError> {
        calculate_btc_correlation(
            symbol,
            frame,
            btc_symbol,
            btc_frame,
            self.config.correlation_min_periods,
        )
    }

    /// Compute every indicator, failing on the first error.
    pub fn compute(
        &self,
        daily: &CandleFrame,
        hourly: &CandleFrame,
    ) -> Result<IndicatorSnapshot, ProcessingError> {
        let volume_profile = self.volume_profile(hourly)?;
        self.compute_with_volume(daily, hourly, volume_profile)
    }

    /// Compute every indicator except the volume profile, which the caller supplies.
    pub fn compute_with_volume(
        &self,
        daily: &CandleFrame,
        hourly: &CandleFrame,
        volume_profile: VolumeProfile,
    ) -> Result<IndicatorSnapshot, ProcessingError> {
        let (ma_20, ma_50, ma_trend) = self.moving_averages(daily)?;

        let current_price = hourly
            .last()
            .or_else(|| daily.last())
            .map(|c| c.close)
            .unwrap_or(Decimal::ZERO);

        let macd = calculate_macd(
            daily.candles(),
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        );
        let levels = self.support_resistance(daily, current_price);

        let snapshot = IndicatorSnapshot {
            rsi_14: self.rsi(daily),
            macd_signal: classify_macd(macd.as_ref(), self.config.macd_threshold),
            macd,
            ma_20,
            ma_50,
            ma_trend,
            volume_profile,
            support_level: levels.as_ref().and_then(|l| l.support_level),
            resistance_level: levels.as_ref().and_then(|l| l.resistance_level),
        };

        debug!(
            rsi = %snapshot.rsi_14,
            macd = %snapshot.macd_signal,
            ma_20 = %snapshot.ma_20,
            ma_50 = %snapshot.ma_50,
            trend = %snapshot.ma_trend,
            volume = %snapshot.volume_profile,
            "Computed indicator snapshot"
        );

        Ok(snapshot)
    }
}
