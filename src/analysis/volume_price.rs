//! Relationship between price direction and volume.

use rust_decimal::Decimal;
use std::fmt;

use crate::analysis::trend::{signed, INSUFFICIENT_DATA};
use crate::common::math;
use crate::errors::{Feature, ProcessingError};
use crate::models::candle::Candle;

/// Trailing candles the relationship is measured over.
pub const VOLUME_PRICE_WINDOW: usize = 10;

const OPERATION: &str = "volume_price_analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePriceRelation {
    StrongBullish,
    WeakBullish,
    StrongBearish,
    WeakBearish,
    Neutral,
}

impl VolumePriceRelation {
    pub fn classify(price_change: Decimal, last_volume: Decimal, average_volume: Decimal) -> Self {
        let heavy = last_volume > average_volume;
        if price_change > Decimal::ZERO {
            if heavy {
                VolumePriceRelation::StrongBullish
            } else {
                VolumePriceRelation::WeakBullish
            }
        } else if price_change < Decimal::ZERO {
            if heavy {
                VolumePriceRelation::StrongBearish
            } else {
                VolumePriceRelation::WeakBearish
            }
        } else {
            VolumePriceRelation::Neutral
        }
    }
}

impl fmt::Display for VolumePriceRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VolumePriceRelation::StrongBullish => "Strong Bullish",
            VolumePriceRelation::WeakBullish => "Weak Bullish",
            VolumePriceRelation::StrongBearish => "Strong Bearish",
            VolumePriceRelation::WeakBearish => "Weak Bearish",
            VolumePriceRelation::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// Compare the price move over the trailing window with the last candle's volume
/// relative to the window average.
pub fn classify_volume_price(candles: &[Candle]) -> Result<String, ProcessingError> {
    let window = &candles[candles.len().saturating_sub(VOLUME_PRICE_WINDOW)..];
    if window.len() < 2 {
        return Ok(INSUFFICIENT_DATA.to_string());
    }
    let (first, last) = (&window[0], &window[window.len() - 1]);

    let volumes: Vec<Decimal> = window.iter().map(|c| c.volume).collect();
    let average = math::mean(&volumes).ok_or_else(|| {
        ProcessingError::calculation(OPERATION, "volume sum overflowed")
            .for_feature(Feature::EnhancedAnalysis)
    })?;
    let change = math::pct_change(first.close, last.close).ok_or_else(|| {
        ProcessingError::calculation(
            OPERATION,
            format!("cannot compute price change from close {}", first.close),
        )
        .for_feature(Feature::EnhancedAnalysis)
    })?;

    let relation = VolumePriceRelation::classify(change, last.volume, average);
    let ratio = last
        .volume
        .checked_div(average)
        .map(|r| format!("{:.2}x", r.round_dp(2)))
        .unwrap_or_else(|| "n/a".to_string());

    Ok(format!(
        "{} (price {}%, last volume {} average)",
        relation,
        signed(change),
        ratio
    ))
}
