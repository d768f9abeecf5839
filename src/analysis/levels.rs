//! Counts how often price tested the support and resistance levels.

use rust_decimal::Decimal;

use crate::errors::ProcessingError;
use crate::models::candle::Candle;

pub const LEVELS_UNAVAILABLE: &str = "Support/resistance levels unavailable";
pub const LEVELS_INVALID: &str = "Invalid support/resistance levels";

/// Lows within `tolerance` (fraction of the level) of support and highs within
/// `tolerance` of resistance each count as one test.
pub fn count_level_tests(
    candles: &[Candle],
    support: Option<Decimal>,
    resistance: Option<Decimal>,
    tolerance: Decimal,
) -> Result<String, ProcessingError> {
    if support.is_none() && resistance.is_none() {
        return Ok(LEVELS_UNAVAILABLE.to_string());
    }
    if support.is_some_and(|s| s <= Decimal::ZERO) || resistance.is_some_and(|r| r <= Decimal::ZERO)
    {
        return Ok(LEVELS_INVALID.to_string());
    }
    if let (Some(s), Some(r)) = (support, resistance) {
        if s >= r {
            return Ok(LEVELS_INVALID.to_string());
        }
    }

    let support_text = match support {
        Some(level) => {
            let band = level * tolerance;
            let tests = candles.iter().filter(|c| (c.low - level).abs() <= band).count();
            format!("support {:.2} tested {} times", level.round_dp(2), tests)
        }
        None => "support unavailable".to_string(),
    };
    let resistance_text = match resistance {
        Some(level) => {
            let band = level * tolerance;
            let tests = candles.iter().filter(|c| (c.high - level).abs() <= band).count();
            format!("resistance {:.2} tested {} times", level.round_dp(2), tests)
        }
        None => "resistance unavailable".to_string(),
    };

    Ok(format!("{}, {}", support_text, resistance_text))
}
