use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the MACD line relative to its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacdSignal::Bullish => "bullish",
            MacdSignal::Bearish => "bearish",
            MacdSignal::Neutral => "neutral",
        })
    }
}

/// Trend implied by the ma_20 / ma_50 ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaTrend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for MaTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaTrend::Uptrend => "uptrend",
            MaTrend::Downtrend => "downtrend",
            MaTrend::Sideways => "sideways",
        })
    }
}

/// Recent volume relative to the preceding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeProfile {
    High,
    Low,
    Normal,
}

impl fmt::Display for VolumeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VolumeProfile::High => "high",
            VolumeProfile::Low => "low",
            VolumeProfile::Normal => "normal",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: Decimal,
    pub signal: Decimal,
    pub histogram: Decimal,
    pub period: (usize, usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceIndicator {
    pub support_level: Option<Decimal>,
    pub resistance_level: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_distance_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance_distance_pct: Option<Decimal>,
}

/// Everything the indicator engine derives from the candle frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi_14: Decimal,
    pub macd_signal: MacdSignal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdIndicator>,
    pub ma_20: Decimal,
    pub ma_50: Decimal,
    pub ma_trend: MaTrend,
    pub volume_profile: VolumeProfile,
    pub support_level: Option<Decimal>,
    pub resistance_level: Option<Decimal>,
}
