//! Fetch, compute, validate and narrate market data for one symbol.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

use crate::analysis::{EnhancedAnalysis, EnhancedAnalysisEngine};
use crate::config::{Config, DegradationPolicy};
use crate::data::CandleFrameBuilder;
use crate::errors::{Feature, MarketDataError, ProcessingError};
use crate::indicators::IndicatorEngine;
use crate::logging::TraceIdGenerator;
use crate::models::candle::{CandleFrame, Timeframe};
use crate::models::indicators::VolumeProfile;
use crate::models::market_data::{MarketDataInputs, MarketDataSet};
use crate::report::{render_basic_report, render_enhanced_report};
use crate::services::market_data::KlineSource;
use crate::validation::{validate_symbol, MarketDataValidator};

pub struct MarketDataService {
    source: Arc<dyn KlineSource>,
    config: Config,
    indicators: IndicatorEngine,
    analysis: EnhancedAnalysisEngine,
    trace_ids: Arc<TraceIdGenerator>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn KlineSource>, config: Config, trace_ids: Arc<TraceIdGenerator>) -> Self {
        Self {
            indicators: IndicatorEngine::from_config(&config),
            analysis: EnhancedAnalysisEngine::new(config.analysis.clone()),
            source,
            config,
            trace_ids,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a validated market data set for `symbol`.
    ///
    /// Every error returned carries this request's trace id as its correlation id.
    pub async fn collect(&self, symbol: &str) -> Result<MarketDataSet, MarketDataError> {
        let trace_id = self.trace_ids.next_id();
        let span = info_span!("collect_market_data", trace_id = %trace_id, symbol);

        self.collect_inner(symbol)
            .instrument(span)
            .await
            .map_err(|e| {
                let e = e.with_correlation_id(&trace_id);
                let context = Value::Object(e.context_map());
                error!(
                    trace_id = %trace_id,
                    context = %context,
                    "Market data collection failed: {}",
                    e
                );
                e
            })
    }

    async fn collect_inner(&self, symbol: &str) -> Result<MarketDataSet, MarketDataError> {
        validate_symbol(symbol)?;

        let daily = self.fetch_frame(symbol, Timeframe::Daily).await?;
        let four_hour = self.fetch_frame(symbol, Timeframe::FourHour).await?;
        let one_hour = self.fetch_frame(symbol, Timeframe::OneHour).await?;

        let volume_profile = match self.indicators.volume_profile(&one_hour) {
            Ok(profile) => profile,
            Err(e) => self.degrade(
                e.for_feature(Feature::VolumeProfile).into(),
                VolumeProfile::Normal,
            )?,
        };

        let snapshot = self
            .indicators
            .compute_with_volume(&daily, &one_hour, volume_profile)?;

        let btc_correlation = match self.btc_correlation(symbol, &daily).await {
            Ok(correlation) => correlation,
            Err(e) => self.degrade(e, None)?,
        };

        let mut inputs = MarketDataInputs::from_indicators(
            symbol,
            Utc::now(),
            [daily, four_hour, one_hour],
            snapshot,
        );
        inputs.btc_correlation = btc_correlation;

        let data = MarketDataSet::build(inputs, &self.config.validation)?;
        info!(
            price = %data.current_price(),
            rsi = %data.rsi_14(),
            trend = %data.ma_trend(),
            "Market data set built"
        );
        Ok(data)
    }

    /// Fetch one timeframe and check its structure before any indicator touches it.
    async fn fetch_frame(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<CandleFrame, MarketDataError> {
        let limit = self.config.exchange.limit(timeframe);
        let rows = self.source.fetch_klines(symbol, timeframe, limit).await?;
        let frame = CandleFrameBuilder::build(timeframe, &rows)?;
        MarketDataValidator::new(&self.config.validation).validate_frame(&frame)?;
        Ok(frame)
    }

    async fn btc_correlation(
        &self,
        symbol: &str,
        daily: &CandleFrame,
    ) -> Result<Option<Decimal>, MarketDataError> {
        let btc_symbol = self.config.exchange.btc_symbol.as_str();
        if symbol == btc_symbol {
            return Ok(None);
        }

        let limit = self.config.exchange.limit(Timeframe::Daily);
        let btc_frame = match self.source.fetch_klines(btc_symbol, Timeframe::Daily, limit).await {
            Ok(rows) => CandleFrameBuilder::build(Timeframe::Daily, &rows)
                .map_err(|e| e.for_feature(Feature::BtcCorrelation))?,
            Err(e) => {
                return Err(ProcessingError::calculation(
                    "btc_correlation",
                    format!("failed to fetch {} reference candles: {}", btc_symbol, e),
                )
                .for_feature(Feature::BtcCorrelation)
                .into())
            }
        };

        Ok(self
            .indicators
            .btc_correlation(symbol, daily, btc_symbol, &btc_frame)?)
    }

    /// Swap a recoverable failure for `fallback` under the degrade policy.
    fn degrade<T>(&self, err: MarketDataError, fallback: T) -> Result<T, MarketDataError> {
        if self.config.degradation == DegradationPolicy::Degrade && err.is_recoverable() {
            let context = Value::Object(err.context_map());
            warn!(
                context = %context,
                "Enhancement feature degraded: {}",
                err
            );
            Ok(fallback)
        } else {
            Err(err)
        }
    }

    pub fn analyze(&self, data: &MarketDataSet) -> EnhancedAnalysis {
        self.analysis.analyze(data)
    }

    pub async fn basic_report(&self, symbol: &str) -> Result<String, MarketDataError> {
        let data = self.collect(symbol).await?;
        Ok(render_basic_report(&data))
    }

    pub async fn enhanced_report(&self, symbol: &str) -> Result<String, MarketDataError> {
        let data = self.collect(symbol).await?;
        let analysis = self.analyze(&data);
        Ok(render_enhanced_report(&data, &analysis))
    }
}
