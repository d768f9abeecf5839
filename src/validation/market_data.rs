//! Invariants a [`MarketDataSet`](crate::models::MarketDataSet) must satisfy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::errors::{FrameViolation, ValidationError};
use crate::models::candle::{CandleFrame, Timeframe};
use crate::models::indicators::MaTrend;
use crate::models::market_data::MarketDataInputs;
use crate::validation::symbol::validate_symbol;

/// Runs every check in a fixed order and stops at the first violation.
pub struct MarketDataValidator<'a> {
    config: &'a ValidationConfig,
}

impl<'a> MarketDataValidator<'a> {
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(
        &self,
        inputs: &MarketDataInputs,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        validate_symbol(&inputs.symbol)?;
        self.validate_timestamp(inputs.timestamp, now)?;

        for timeframe in Timeframe::ALL {
            self.validate_slot(timeframe, inputs.frame(timeframe))?;
        }

        validate_rsi(inputs.rsi_14)?;
        self.validate_moving_average("ma_20", inputs.ma_20)?;
        self.validate_moving_average("ma_50", inputs.ma_50)?;

        if let Some(correlation) = inputs.btc_correlation {
            if correlation < Decimal::NEGATIVE_ONE || correlation > Decimal::ONE {
                return Err(ValidationError::field(
                    "btc_correlation",
                    correlation,
                    "must be between -1 and 1",
                ));
            }
        }

        if let Some(index) = inputs.fear_greed_index {
            if index > 100 {
                return Err(ValidationError::field(
                    "fear_greed_index",
                    index,
                    "must be between 0 and 100",
                ));
            }
        }

        validate_levels(inputs.support_level, inputs.resistance_level)?;
        self.validate_trend_consistency(inputs.ma_20, inputs.ma_50, inputs.ma_trend)?;
        self.validate_price_sanity(&inputs.one_hour, inputs.ma_20)?;

        debug!(symbol = %inputs.symbol, "Market data validation passed");
        Ok(())
    }

    fn validate_timestamp(
        &self,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let earliest = now - self.config.max_age;
        let latest = now + self.config.max_future_skew;

        if timestamp < earliest || timestamp > latest {
            return Err(ValidationError::timestamp(timestamp, earliest, latest));
        }
        Ok(())
    }

    pub fn validate_frame(&self, frame: &CandleFrame) -> Result<(), ValidationError> {
        self.validate_slot(frame.timeframe(), frame)
    }

    /// Check `frame` as the `slot` frame of a set. Row minimums follow the slot.
    pub fn validate_slot(
        &self,
        slot: Timeframe,
        frame: &CandleFrame,
    ) -> Result<(), ValidationError> {
        let name = slot.name();

        if frame.timeframe() != slot {
            return Err(ValidationError::frame(
                name,
                FrameViolation::TimeframeMismatch {
                    found: frame.timeframe(),
                },
            ));
        }

        if frame.is_empty() {
            return Err(ValidationError::frame(name, FrameViolation::Empty));
        }

        let required = self.config.min_rows(slot);
        if frame.len() < required {
            return Err(ValidationError::frame(
                name,
                FrameViolation::InsufficientRows {
                    required,
                    available: frame.len(),
                },
            ));
        }

        let candles = frame.candles();
        for (row, candle) in candles.iter().enumerate() {
            if row > 0 && candle.timestamp < candles[row - 1].timestamp {
                return Err(ValidationError::frame(
                    name,
                    FrameViolation::UnorderedTimestamps { row },
                ));
            }

            for (column, value) in [
                ("open", candle.open),
                ("high", candle.high),
                ("low", candle.low),
                ("close", candle.close),
            ] {
                if value <= Decimal::ZERO {
                    return Err(ValidationError::frame(
                        name,
                        FrameViolation::InvalidNumeric {
                            row,
                            column,
                            value: value.to_string(),
                        },
                    ));
                }
            }

            let body_top = candle.open.max(candle.close);
            let body_bottom = candle.open.min(candle.close);
            if candle.high < body_top {
                return Err(ValidationError::frame(
                    name,
                    FrameViolation::InvalidOhlc {
                        row,
                        detail: format!(
                            "high {} is below max(open, close) {}",
                            candle.high, body_top
                        ),
                    },
                ));
            }
            if candle.low > body_bottom {
                return Err(ValidationError::frame(
                    name,
                    FrameViolation::InvalidOhlc {
                        row,
                        detail: format!(
                            "low {} is above min(open, close) {}",
                            candle.low, body_bottom
                        ),
                    },
                ));
            }

            if candle.volume < Decimal::ZERO {
                return Err(ValidationError::frame(
                    name,
                    FrameViolation::NegativeVolume {
                        row,
                        value: candle.volume.to_string(),
                    },
                ));
            }
        }

        Ok(())
    }

    fn validate_moving_average(&self, field: &str, value: Decimal) -> Result<(), ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::field(field, value, "must be positive"));
        }
        if value > self.config.max_moving_average {
            return Err(ValidationError::field(
                field,
                value,
                format!("must not exceed {}", self.config.max_moving_average),
            ));
        }
        Ok(())
    }

    fn validate_trend_consistency(
        &self,
        ma_20: Decimal,
        ma_50: Decimal,
        trend: MaTrend,
    ) -> Result<(), ValidationError> {
        let ratio = ma_20.checked_div(ma_50).ok_or_else(|| {
            ValidationError::field("ma_50", ma_50, "cannot be used as a trend divisor")
        })?;

        let band = self.config.trend_band;
        let expected = if ratio > Decimal::ONE + band {
            Some(MaTrend::Uptrend)
        } else if ratio < Decimal::ONE - band {
            Some(MaTrend::Downtrend)
        } else {
            None
        };

        match expected {
            Some(expected) if expected != trend => Err(ValidationError::field(
                "ma_trend",
                trend,
                format!(
                    "contradicts ma_20/ma_50 ratio {:.4}; expected {} outside the ±{}% band",
                    ratio,
                    expected,
                    (band * Decimal::ONE_HUNDRED).normalize()
                ),
            )),
            _ => Ok(()),
        }
    }

    fn validate_price_sanity(
        &self,
        shortest: &CandleFrame,
        ma_20: Decimal,
    ) -> Result<(), ValidationError> {
        let Some(latest) = shortest.last() else {
            return Err(ValidationError::frame(
                shortest.timeframe().name(),
                FrameViolation::Empty,
            ));
        };

        let deviation = (latest.close - ma_20)
            .abs()
            .checked_div(ma_20)
            .ok_or_else(|| ValidationError::field("ma_20", ma_20, "must be positive"))?;

        if deviation > self.config.max_price_ma_deviation {
            return Err(ValidationError::field(
                "current_price",
                latest.close,
                format!(
                    "deviates {:.2}% from ma_20 ({}); maximum allowed is {}%",
                    deviation * Decimal::ONE_HUNDRED,
                    ma_20,
                    (self.config.max_price_ma_deviation * Decimal::ONE_HUNDRED).normalize()
                ),
            ));
        }
        Ok(())
    }
}

fn validate_rsi(rsi: Decimal) -> Result<(), ValidationError> {
    if rsi < Decimal::ZERO || rsi > Decimal::ONE_HUNDRED {
        return Err(ValidationError::field(
            "rsi_14",
            rsi,
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_levels(
    support: Option<Decimal>,
    resistance: Option<Decimal>,
) -> Result<(), ValidationError> {
    if let Some(support) = support {
        if support <= Decimal::ZERO {
            return Err(ValidationError::field("support_level", support, "must be positive"));
        }
    }
    if let Some(resistance) = resistance {
        if resistance <= Decimal::ZERO {
            return Err(ValidationError::field(
                "resistance_level",
                resistance,
                "must be positive",
            ));
        }
    }
    if let (Some(support), Some(resistance)) = (support, resistance) {
        if support >= resistance {
            return Err(ValidationError::field(
                "support_level",
                support,
                format!("must be lower than resistance_level ({})", resistance),
            ));
        }
    }
    Ok(())
}
