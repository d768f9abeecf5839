//! Diagnostic context attached to every engine error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::backtrace::{Backtrace, BacktraceStatus};
use uuid::Uuid;

/// Minimal view of the process at the moment an error was raised.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub pid: u32,
    pub thread: String,
    pub os: &'static str,
    pub arch: &'static str,
    pub version: &'static str,
}

impl SystemSnapshot {
    pub fn capture() -> Self {
        Self {
            pid: std::process::id(),
            thread: std::thread::current()
                .name()
                .unwrap_or("unnamed")
                .to_string(),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Correlation token, operation and snapshot carried by an error.
///
/// A context created outside of a traced request gets a random v4 UUID as its
/// correlation id; the service re-stamps errors with the request's token via
/// [`ErrorContext::with_correlation_id`].
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub correlation_id: String,
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: SystemSnapshot,
    /// Rendered call stack. Empty unless `RUST_BACKTRACE` enables capture.
    pub call_stack: String,
    pub extra: Map<String, Value>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        let backtrace = Backtrace::capture();
        let call_stack = match backtrace.status() {
            BacktraceStatus::Captured => backtrace.to_string(),
            _ => String::new(),
        };

        Self {
            correlation_id: Uuid::new_v4().to_string(),
            operation: operation.into(),
            timestamp: Utc::now(),
            snapshot: SystemSnapshot::capture(),
            call_stack,
            extra: Map::new(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flatten into a JSON object suitable for a structured log sink.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("correlation_id".into(), json!(self.correlation_id));
        map.insert("operation".into(), json!(self.operation));
        map.insert("timestamp".into(), json!(self.timestamp.to_rfc3339()));
        map.insert(
            "system".into(),
            serde_json::to_value(&self.snapshot).unwrap_or(Value::Null),
        );
        if !self.call_stack.is_empty() {
            map.insert("call_stack".into(), json!(self.call_stack));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}
