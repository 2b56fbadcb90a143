//! In-process fixed-window counters.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::store::RateLimitStore;
use crate::infrastructure::cache::CacheResult;

/// Process-local counters. Only correct for a single instance; used when
/// Redis is not configured.
pub struct MemoryRateLimitStore {
    counters: Cache<String, Arc<AtomicU64>>,
}

impl MemoryRateLimitStore {
    /// Creates a store whose entries expire `ttl` after insertion.
    ///
    /// `ttl` should be at least as long as the longest window in use.
    pub fn new(ttl: Duration) -> Self {
        Self {
            counters: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(100_000)
                .build(),
        }
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(&self, key: &str, _window: Duration) -> CacheResult<u64> {
        let counter = self
            .counters
            .get_with(key.to_string(), async { Arc::new(AtomicU64::new(0)) })
            .await;

        Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
