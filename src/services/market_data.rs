//! Kline source interface and an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::data::RawKline;
use crate::errors::{NetworkError, NetworkErrorKind};
use crate::models::candle::Timeframe;

#[async_trait]
pub trait KlineSource: Send + Sync {
    /// Fetch up to `limit` raw kline rows for a symbol, oldest first.
    async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<RawKline>, NetworkError>;
}

/// Serves canned rows keyed by symbol and timeframe.
///
/// Unknown keys answer with a `BadResponse` error, like an exchange rejecting
/// an unlisted symbol.
#[derive(Debug, Default)]
pub struct InMemoryKlineSource {
    rows: RwLock<HashMap<(String, Timeframe), Vec<RawKline>>>,
}

impl InMemoryKlineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, symbol: &str, timeframe: Timeframe, rows: Vec<RawKline>) -> Self {
        self.insert(symbol, timeframe, rows);
        self
    }

    pub fn insert(&self, symbol: &str, timeframe: Timeframe, rows: Vec<RawKline>) {
        if let Ok(mut map) = self.rows.write() {
            map.insert((symbol.to_string(), timeframe), rows);
        }
    }
}

#[async_trait]
impl KlineSource for InMemoryKlineSource {
    async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<RawKline>, NetworkError> {
        let endpoint = format!("memory://{}/{}", symbol, timeframe.interval());
        let map = self.rows.read().map_err(|_| {
            NetworkError::new(NetworkErrorKind::Connectivity, &endpoint, "kline store poisoned")
        })?;

        let rows = map.get(&(symbol.to_string(), timeframe)).ok_or_else(|| {
            NetworkError::new(NetworkErrorKind::BadResponse, &endpoint, "Invalid symbol.")
                .with_status(400)
        })?;

        let start = rows.len().saturating_sub(limit);
        Ok(rows[start..].to_vec())
    }
}
