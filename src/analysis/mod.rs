//! Best-effort candlestick narratives layered on a validated market data set.
//!
//! Each section runs independently. A failing section is reported as
//! `"<name>: Analysis failed (<message>)"` and never affects the others or the
//! base summary.

pub mod key_candles;
pub mod levels;
pub mod patterns;
pub mod trend;
pub mod volume_price;

pub use key_candles::{select_key_candles, KeyCandle, KeyCandleReason};
pub use levels::count_level_tests;
pub use patterns::{describe_patterns, detect_patterns, CandlePattern};
pub use trend::{describe_recent_trend, RecentTrend};
pub use volume_price::{classify_volume_price, VolumePriceRelation};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::errors::{Feature, ProcessingError};
use crate::models::candle::{CandleFrame, Timeframe};
use crate::models::market_data::MarketDataSet;

pub const RECENT_TREND_SECTION: &str = "Recent Trend";
pub const PATTERNS_SECTION: &str = "Patterns";
pub const LEVEL_TESTS_SECTION: &str = "Support/Resistance Tests";
pub const VOLUME_SECTION: &str = "Volume Analysis";

/// Outcome of one narrative section.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSection {
    pub name: &'static str,
    pub outcome: Result<String, String>,
}

impl AnalysisSection {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(text) => format!("{}: {}", self.name, text),
            Err(message) => format!("{}: Analysis failed ({})", self.name, message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedAnalysis {
    pub summary: String,
    pub timeframe: Timeframe,
    pub key_candles: Vec<KeyCandle>,
    pub sections: Vec<AnalysisSection>,
}

impl EnhancedAnalysis {
    pub fn section(&self, name: &str) -> Option<&AnalysisSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn failed_sections(&self) -> impl Iterator<Item = &AnalysisSection> {
        self.sections.iter().filter(|s| !s.is_ok())
    }

    /// Summary line followed by one line per section.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.sections.len() + 1);
        lines.push(format!("Summary: {}", self.summary));
        lines.extend(self.sections.iter().map(AnalysisSection::render));
        lines.join("\n")
    }
}

/// Run one section, converting its failure into a rendered message.
pub fn run_section<F>(name: &'static str, analysis: F) -> AnalysisSection
where
    F: FnOnce() -> Result<String, ProcessingError>,
{
    match analysis() {
        Ok(text) => AnalysisSection {
            name,
            outcome: Ok(text),
        },
        Err(err) => {
            let err = err.for_feature(Feature::EnhancedAnalysis);
            warn!(
                section = name,
                correlation_id = %err.context.correlation_id,
                error = %err,
                "Analysis section failed"
            );
            AnalysisSection {
                name,
                outcome: Err(err.to_string()),
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnhancedAnalysisEngine {
    config: AnalysisConfig,
}

impl EnhancedAnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// The 4h frame, or the daily frame when 4h has fewer than two candles.
    pub fn analysis_frame<'a>(&self, data: &'a MarketDataSet) -> &'a CandleFrame {
        let four_hour = data.frame(Timeframe::FourHour);
        if four_hour.len() >= 2 {
            four_hour
        } else {
            data.frame(Timeframe::Daily)
        }
    }

    pub fn analyze(&self, data: &MarketDataSet) -> EnhancedAnalysis {
        let frame = self.analysis_frame(data);
        let candles = frame.candles();
        let key_candles = select_key_candles(candles, self.config.max_key_candles);
        let closes: Vec<Decimal> = key_candles.iter().map(|k| k.candle.close).collect();

        let sections = vec![
            run_section(RECENT_TREND_SECTION, || describe_recent_trend(&closes)),
            run_section(PATTERNS_SECTION, || describe_patterns(&key_candles)),
            run_section(LEVEL_TESTS_SECTION, || {
                count_level_tests(
                    candles,
                    data.support_level(),
                    data.resistance_level(),
                    self.config.level_tolerance,
                )
            }),
            run_section(VOLUME_SECTION, || classify_volume_price(candles)),
        ];

        debug!(
            symbol = data.symbol(),
            timeframe = %frame.timeframe(),
            key_candles = key_candles.len(),
            failed = sections.iter().filter(|s| !s.is_ok()).count(),
            "Completed enhanced analysis"
        );

        EnhancedAnalysis {
            summary: base_summary(data),
            timeframe: frame.timeframe(),
            key_candles,
            sections,
        }
    }
}

/// One-line digest of the indicator values. Never fails.
pub fn base_summary(data: &MarketDataSet) -> String {
    format!(
        "{} at {:.2} with RSI {:.2}, {} MACD, {} moving averages and {} volume",
        data.symbol(),
        data.current_price().round_dp(2),
        data.rsi_14().round_dp(2),
        data.macd_signal(),
        data.ma_trend(),
        data.volume_profile()
    )
}
