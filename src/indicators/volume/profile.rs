//! Volume profile: recent activity relative to the window before it.

use rust_decimal::Decimal;

use crate::common::math;
use crate::errors::{Feature, ProcessingError};
use crate::models::candle::Candle;
use crate::models::indicators::VolumeProfile;

const OPERATION: &str = "volume_profile";

/// Compare the mean volume of the last `window` candles with the mean of the
/// (up to) `window` candles before them.
///
/// Too little data or an all-zero volume series is `Normal`, not an error.
pub fn calculate_volume_profile(
    candles: &[Candle],
    window: usize,
    high_ratio: Decimal,
    low_ratio: Decimal,
) -> Result<VolumeProfile, ProcessingError> {
    if window == 0 || candles.len() < window {
        return Ok(VolumeProfile::Normal);
    }

    let volumes: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();
    if volumes.iter().all(|v| v.is_zero()) {
        return Ok(VolumeProfile::Normal);
    }

    let split = volumes.len() - window;
    let recent = &volumes[split..];
    let preceding = &volumes[split.saturating_sub(window)..split];
    if preceding.is_empty() {
        return Ok(VolumeProfile::Normal);
    }

    let overflow = || {
        ProcessingError::calculation(OPERATION, "volume average overflowed")
            .for_feature(Feature::VolumeProfile)
    };
    let recent_avg = math::mean(recent).ok_or_else(overflow)?;
    let preceding_avg = math::mean(preceding).ok_or_else(overflow)?;

    if preceding_avg.is_zero() {
        return Ok(if recent_avg > Decimal::ZERO {
            VolumeProfile::High
        } else {
            VolumeProfile::Normal
        });
    }

    let ratio = recent_avg.checked_div(preceding_avg).ok_or_else(overflow)?;

    Ok(if ratio > high_ratio {
        VolumeProfile::High
    } else if ratio < low_ratio {
        VolumeProfile::Low
    } else {
        VolumeProfile::Normal
    })
}
