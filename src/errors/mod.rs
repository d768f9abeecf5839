//! Typed failures raised by the engine.
//!
//! Three families mirror how callers react to them:
//! - [`ValidationError`]: malformed or out-of-range input or result. Always critical.
//! - [`NetworkError`]: connectivity, timeouts, rate limiting, malformed responses. Always critical.
//! - [`ProcessingError`]: calculation failures and insufficient data. Recoverable when
//!   tagged with an enhancement [`Feature`].

pub mod context;

pub use context::{ErrorContext, SystemSnapshot};

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

use crate::models::candle::Timeframe;

pub const SYMBOL_FORMAT: &str = "2-6 uppercase letters followed by USDT (e.g. BTCUSDT)";

/// Kept for callers that match on the generic validation failure name.
pub type DataValidationError = ValidationError;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Recoverable,
}

/// Enhancement features whose processing failures may degrade instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    BtcCorrelation,
    VolumeProfile,
    EnhancedAnalysis,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::BtcCorrelation => "btc_correlation",
            Feature::VolumeProfile => "volume_profile",
            Feature::EnhancedAnalysis => "enhanced_analysis",
        };
        f.write_str(name)
    }
}

/// What was wrong with a candle frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameViolation {
    Empty,
    TimeframeMismatch { found: Timeframe },
    InsufficientRows { required: usize, available: usize },
    UnorderedTimestamps { row: usize },
    InvalidNumeric { row: usize, column: &'static str, value: String },
    InvalidOhlc { row: usize, detail: String },
    NegativeVolume { row: usize, value: String },
}

impl FrameViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            FrameViolation::Empty => "empty",
            FrameViolation::TimeframeMismatch { .. } => "timeframe_mismatch",
            FrameViolation::InsufficientRows { .. } => "insufficient_rows",
            FrameViolation::UnorderedTimestamps { .. } => "unordered_timestamps",
            FrameViolation::InvalidNumeric { .. } => "invalid_numeric",
            FrameViolation::InvalidOhlc { .. } => "invalid_ohlc",
            FrameViolation::NegativeVolume { .. } => "negative_volume",
        }
    }
}

impl fmt::Display for FrameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameViolation::Empty => write!(f, "cannot be empty"),
            FrameViolation::TimeframeMismatch { found } => {
                write!(f, "holds {} candles", found)
            }
            FrameViolation::InsufficientRows { required, available } => write!(
                f,
                "has {} rows, at least {} required",
                available, required
            ),
            FrameViolation::UnorderedTimestamps { row } => {
                write!(f, "timestamps are not in ascending order at row {}", row)
            }
            FrameViolation::InvalidNumeric { row, column, value } => {
                write!(f, "has invalid {} value '{}' at row {}", column, value, row)
            }
            FrameViolation::InvalidOhlc { row, detail } => {
                write!(f, "has invalid OHLC relationship at row {}: {}", row, detail)
            }
            FrameViolation::NegativeVolume { row, value } => {
                write!(f, "has negative volume {} at row {}", value, row)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid symbol '{symbol}': {reason}. Expected format: {expected}")]
    Symbol {
        symbol: String,
        reason: String,
        expected: &'static str,
        context: ErrorContext,
    },

    #[error("DataFrame '{frame}' {violation}")]
    Frame {
        frame: String,
        violation: FrameViolation,
        context: ErrorContext,
    },

    #[error("{field} ({value}) {reason}")]
    Field {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },

    #[error("timestamp {timestamp} is outside the accepted window [{earliest}, {latest}]")]
    Timestamp {
        timestamp: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        context: ErrorContext,
    },
}

impl ValidationError {
    pub fn symbol(symbol: &str, reason: impl Into<String>) -> Self {
        ValidationError::Symbol {
            symbol: symbol.to_string(),
            reason: reason.into(),
            expected: SYMBOL_FORMAT,
            context: ErrorContext::new("validate_symbol").with_extra("symbol", symbol),
        }
    }

    pub fn frame(frame: impl Into<String>, violation: FrameViolation) -> Self {
        let frame = frame.into();
        ValidationError::Frame {
            context: ErrorContext::new("validate_frame").with_extra("frame", frame.as_str()),
            frame,
            violation,
        }
    }

    pub fn field(
        field: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        let field = field.into();
        ValidationError::Field {
            context: ErrorContext::new("validate_market_data").with_extra("field", field.as_str()),
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn timestamp(
        timestamp: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Self {
        ValidationError::Timestamp {
            timestamp,
            earliest,
            latest,
            context: ErrorContext::new("validate_timestamp"),
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            ValidationError::Symbol { context, .. }
            | ValidationError::Frame { context, .. }
            | ValidationError::Field { context, .. }
            | ValidationError::Timestamp { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            ValidationError::Symbol { context, .. }
            | ValidationError::Frame { context, .. }
            | ValidationError::Field { context, .. }
            | ValidationError::Timestamp { context, .. } => context,
        }
    }

    fn extras(&self, map: &mut Map<String, Value>) {
        match self {
            ValidationError::Symbol {
                symbol, expected, ..
            } => {
                map.insert("symbol".into(), json!(symbol));
                map.insert("expected_format".into(), json!(expected));
            }
            ValidationError::Frame {
                frame, violation, ..
            } => {
                map.insert("dataframe".into(), json!(frame));
                map.insert("violation".into(), json!(violation.kind()));
            }
            ValidationError::Field { field, value, .. } => {
                map.insert("field".into(), json!(field));
                map.insert("value".into(), json!(value));
            }
            ValidationError::Timestamp {
                timestamp,
                earliest,
                latest,
                ..
            } => {
                map.insert("value".into(), json!(timestamp.to_rfc3339()));
                map.insert("earliest".into(), json!(earliest.to_rfc3339()));
                map.insert("latest".into(), json!(latest.to_rfc3339()));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Connectivity,
    Timeout,
    RateLimited,
    BadResponse,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkErrorKind::Connectivity => "connection failure",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::RateLimited => "rate limited",
            NetworkErrorKind::BadResponse => "bad response",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
#[error("{kind} while fetching {endpoint}: {message}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub endpoint: String,
    pub message: String,
    pub status: Option<u16>,
    pub context: ErrorContext,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            kind,
            context: ErrorContext::new("fetch_klines").with_extra("endpoint", endpoint.as_str()),
            endpoint,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Connectivity problems, timeouts, rate limits and server-side failures are worth
    /// another attempt; a malformed or rejected response is not.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            NetworkErrorKind::BadResponse => self.status.is_some_and(|s| s >= 500),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingErrorKind {
    CalculationFailed,
    InsufficientData { required: usize, available: usize },
    InvalidData,
}

impl fmt::Display for ProcessingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingErrorKind::CalculationFailed => write!(f, "calculation failed"),
            ProcessingErrorKind::InsufficientData {
                required,
                available,
            } => write!(
                f,
                "insufficient data (required {} periods, available {})",
                required, available
            ),
            ProcessingErrorKind::InvalidData => write!(f, "invalid data"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ProcessingError {
    pub kind: ProcessingErrorKind,
    pub message: String,
    pub feature: Option<Feature>,
    pub context: ErrorContext,
}

impl ProcessingError {
    pub fn new(kind: ProcessingErrorKind, operation: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            feature: None,
            context: ErrorContext::new(operation),
        }
    }

    pub fn calculation(operation: &str, message: impl Into<String>) -> Self {
        Self::new(ProcessingErrorKind::CalculationFailed, operation, message)
    }

    pub fn insufficient_data(
        operation: &str,
        required: usize,
        available: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            ProcessingErrorKind::InsufficientData {
                required,
                available,
            },
            operation,
            message,
        )
    }

    pub fn invalid_data(operation: &str, message: impl Into<String>) -> Self {
        Self::new(ProcessingErrorKind::InvalidData, operation, message)
    }

    pub fn for_feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }
}

/// Umbrella error returned by the service layer.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl MarketDataError {
    pub fn context(&self) -> &ErrorContext {
        match self {
            MarketDataError::Validation(e) => e.context(),
            MarketDataError::Network(e) => &e.context,
            MarketDataError::Processing(e) => &e.context,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            MarketDataError::Validation(ValidationError::Symbol { .. }) => "SymbolValidationError",
            MarketDataError::Validation(_) => "ValidationError",
            MarketDataError::Network(_) => "NetworkError",
            MarketDataError::Processing(ProcessingError {
                kind: ProcessingErrorKind::InsufficientData { .. },
                ..
            }) => "DataInsufficientError",
            MarketDataError::Processing(_) => "ProcessingError",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MarketDataError::Processing(ProcessingError {
                feature: Some(_), ..
            }) => Severity::Recoverable,
            _ => Severity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }

    pub fn with_correlation_id(mut self, correlation_id: &str) -> Self {
        let context = match &mut self {
            MarketDataError::Validation(e) => e.context_mut(),
            MarketDataError::Network(e) => &mut e.context,
            MarketDataError::Processing(e) => &mut e.context,
        };
        context.correlation_id = correlation_id.to_string();
        self
    }

    /// Context dictionary for the structured log sink.
    pub fn context_map(&self) -> Map<String, Value> {
        let mut map = self.context().to_map();
        map.insert("error_type".into(), json!(self.error_type()));
        map.insert("message".into(), json!(self.to_string()));
        map.insert(
            "severity".into(),
            json!(match self.severity() {
                Severity::Critical => "critical",
                Severity::Recoverable => "recoverable",
            }),
        );

        match self {
            MarketDataError::Validation(e) => e.extras(&mut map),
            MarketDataError::Network(e) => {
                map.insert("network_error".into(), json!(e.kind.to_string()));
                map.insert("endpoint".into(), json!(e.endpoint));
                if let Some(status) = e.status {
                    map.insert("status".into(), json!(status));
                }
            }
            MarketDataError::Processing(e) => {
                if let ProcessingErrorKind::InsufficientData {
                    required,
                    available,
                } = e.kind
                {
                    map.insert("required_periods".into(), json!(required));
                    map.insert("available_periods".into(), json!(available));
                }
                if let Some(feature) = e.feature {
                    map.insert("feature".into(), json!(feature.to_string()));
                }
            }
        }
        map
    }
}
