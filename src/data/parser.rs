use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::errors::ProcessingError;

const OPERATION: &str = "parse_kline";

/// Parse a fixed-point number from an exchange string such as `"42150.01000000"`.
///
/// Plain and scientific notation are accepted. `NaN`, infinities and empty strings
/// are rejected rather than coerced.
pub fn parse_decimal_str(raw: &str) -> Result<Decimal, ProcessingError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| {
            ProcessingError::invalid_data(OPERATION, format!("invalid numeric value '{}'", raw))
        })
}

/// Parse a numeric kline field that may arrive as a JSON string or number.
pub fn parse_decimal(
    value: &Value,
    column: &'static str,
    row: usize,
) -> Result<Decimal, ProcessingError> {
    let parsed = match value {
        Value::String(s) => parse_decimal_str(s),
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        other => Err(ProcessingError::invalid_data(
            OPERATION,
            format!("expected a numeric value, got {}", other),
        )),
    };

    parsed.map_err(|e| {
        ProcessingError::invalid_data(
            OPERATION,
            format!("row {} column '{}': {}", row, column, e.message),
        )
    })
}

/// Parse an epoch-millisecond open time.
pub fn parse_open_time(value: &Value, row: usize) -> Result<DateTime<Utc>, ProcessingError> {
    let millis = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    millis
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| {
            ProcessingError::invalid_data(
                OPERATION,
                format!("row {} has invalid open time {}", row, value),
            )
        })
}
