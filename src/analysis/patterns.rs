//! Single-candle pattern recognition.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

use crate::analysis::key_candles::KeyCandle;
use crate::errors::{Feature, ProcessingError};
use crate::models::candle::Candle;

const DOJI_MAX_BODY: Decimal = dec!(0.10);
const LONG_SHADOW_MIN: Decimal = dec!(0.60);
const SMALL_BODY_MAX: Decimal = dec!(0.30);
const STRONG_BODY_MIN: Decimal = dec!(0.70);

/// Most recent pattern hits listed in the narrative.
pub const MAX_REPORTED_PATTERNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandlePattern {
    Doji,
    Hammer,
    ShootingStar,
    StrongBull,
    StrongBear,
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandlePattern::Doji => "Doji",
            CandlePattern::Hammer => "Hammer",
            CandlePattern::ShootingStar => "Shooting Star",
            CandlePattern::StrongBull => "Strong Bull",
            CandlePattern::StrongBear => "Strong Bear",
        };
        f.write_str(name)
    }
}

/// Classify a candle from its body and shadow proportions.
///
/// A candle can match more than one pattern (a tiny-bodied hammer is also a doji).
/// Zero or negative range matches nothing.
pub fn detect_patterns(candle: &Candle) -> Vec<CandlePattern> {
    let range = candle.range();
    if range <= Decimal::ZERO {
        return Vec::new();
    }

    let body = candle.body() / range;
    let upper = candle.upper_shadow() / range;
    let lower = candle.lower_shadow() / range;

    let mut patterns = Vec::new();
    if body < DOJI_MAX_BODY {
        patterns.push(CandlePattern::Doji);
    }
    if lower > LONG_SHADOW_MIN && body < SMALL_BODY_MAX {
        patterns.push(CandlePattern::Hammer);
    }
    if upper > LONG_SHADOW_MIN && body < SMALL_BODY_MAX {
        patterns.push(CandlePattern::ShootingStar);
    }
    if body > STRONG_BODY_MIN {
        if candle.close > candle.open {
            patterns.push(CandlePattern::StrongBull);
        } else if candle.close < candle.open {
            patterns.push(CandlePattern::StrongBear);
        }
    }
    patterns
}

/// Narrate the patterns found among the key candles, latest hits last.
pub fn describe_patterns(key_candles: &[KeyCandle]) -> Result<String, ProcessingError> {
    if key_candles.iter().any(|k| k.candle.high < k.candle.low) {
        return Err(ProcessingError::invalid_data(
            "pattern_recognition",
            "key candle has high below low",
        )
        .for_feature(Feature::EnhancedAnalysis));
    }

    let hits: Vec<String> = key_candles
        .iter()
        .flat_map(|k| {
            detect_patterns(&k.candle).into_iter().map(move |pattern| {
                format!("{} at {}", pattern, k.candle.timestamp.format("%Y-%m-%d %H:%M"))
            })
        })
        .collect();

    if hits.is_empty() {
        return Ok("No significant patterns detected".to_string());
    }

    let start = hits.len().saturating_sub(MAX_REPORTED_PATTERNS);
    Ok(hits[start..].join(", "))
}
