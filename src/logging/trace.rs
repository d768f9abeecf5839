//! Correlation token issuance.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Issues process-unique correlation tokens of the form `kls-<session>-<seq>`.
///
/// Constructed once and shared (usually behind an `Arc`) by everything that opens
/// traced requests. The sequence is an atomic counter, so concurrent callers never
/// observe the same token.
#[derive(Debug)]
pub struct TraceIdGenerator {
    session: String,
    next: AtomicU64,
}

impl TraceIdGenerator {
    pub fn new() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self::with_session(&uuid[..8])
    }

    pub fn with_session(session: &str) -> Self {
        Self {
            session: session.to_string(),
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> String {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        format!("kls-{}-{:06}", self.session, seq)
    }

    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for TraceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
