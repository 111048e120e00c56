//! Short-lived query-result cache for hardware row sets.

use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use crate::model::JoinedRow;
use crate::source::HardwareQuery;

/// Cache scope for hardware detail row sets.
pub const HARDWARE_DETAILS_SCOPE: &str = "hardwareDetails";

pub type CachedRows = Arc<Vec<JoinedRow>>;

/// Best-effort row cache. Expiry and eviction belong to the implementation.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CachedRows>;
    fn set(&self, key: &str, rows: CachedRows);
}

pub struct QueryCache {
    rows: Cache<String, CachedRows>,
}

impl QueryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            rows: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl ResultCache for QueryCache {
    fn get(&self, key: &str) -> Option<CachedRows> {
        self.rows.get(key)
    }

    fn set(&self, key: &str, rows: CachedRows) {
        self.rows.insert(key.to_string(), rows);
    }
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &str) -> Option<CachedRows> {
        None
    }

    fn set(&self, _key: &str, _rows: CachedRows) {}
}

/// Deterministic key for a query within a cache scope.
pub fn query_key(scope: &str, query: &HardwareQuery) -> String {
    let mut h = Sha256::new();
    h.update(scope.as_bytes());
    h.update(b"\n");
    h.update(query.hardware_id.as_bytes());
    h.update(b"\n");
    h.update(query.origin.as_bytes());
    h.update(b"\n");
    h.update(query.start.timestamp().to_string().as_bytes());
    h.update(b"\n");
    h.update(query.end.timestamp().to_string().as_bytes());
    hex::encode(h.finalize())
}
