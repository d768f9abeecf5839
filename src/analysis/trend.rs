//! Short-horizon trend narration over key-candle closes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

use crate::common::math;
use crate::errors::{Feature, ProcessingError};

const STRONG_DRIFT_PCT: Decimal = dec!(5);
const DRIFT_PCT: Decimal = dec!(1);

pub const INSUFFICIENT_DATA: &str = "Insufficient data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecentTrend {
    StrongUptrend,
    Uptrend,
    Sideways,
    Downtrend,
    StrongDowntrend,
}

impl RecentTrend {
    pub fn from_drift(drift_pct: Decimal) -> Self {
        if drift_pct > STRONG_DRIFT_PCT {
            RecentTrend::StrongUptrend
        } else if drift_pct > DRIFT_PCT {
            RecentTrend::Uptrend
        } else if drift_pct < -STRONG_DRIFT_PCT {
            RecentTrend::StrongDowntrend
        } else if drift_pct < -DRIFT_PCT {
            RecentTrend::Downtrend
        } else {
            RecentTrend::Sideways
        }
    }
}

impl fmt::Display for RecentTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecentTrend::StrongUptrend => "Strong Uptrend",
            RecentTrend::Uptrend => "Uptrend",
            RecentTrend::Sideways => "Sideways",
            RecentTrend::Downtrend => "Downtrend",
            RecentTrend::StrongDowntrend => "Strong Downtrend",
        };
        f.write_str(label)
    }
}

/// Describe the drift between the first and last close.
pub fn describe_recent_trend(closes: &[Decimal]) -> Result<String, ProcessingError> {
    if closes.len() < 2 {
        return Ok(INSUFFICIENT_DATA.to_string());
    }
    let (first, last) = (closes[0], closes[closes.len() - 1]);

    let drift = math::pct_change(first, last).ok_or_else(|| {
        ProcessingError::calculation(
            "trend_narration",
            format!("cannot compute drift from close {} to {}", first, last),
        )
        .for_feature(Feature::EnhancedAnalysis)
    })?;

    Ok(format!(
        "{} ({}% across {} key candles)",
        RecentTrend::from_drift(drift),
        signed(drift),
        closes.len()
    ))
}

/// Two decimal places with an explicit sign.
pub(crate) fn signed(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{:.2}", rounded)
    } else {
        format!("+{:.2}", rounded.abs())
    }
}
