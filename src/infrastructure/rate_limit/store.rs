//! Fixed-window counter store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::infrastructure::cache::CacheResult;

/// Shared counter store for fixed-window rate limiting.
///
/// Counters live outside the process (Redis) in production so every instance
/// sees the same totals; the in-memory store is a single-instance fallback.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Increments the counter stored under `key` and returns the new value.
    ///
    /// The key expires after `window`, which bounds memory use; callers put
    /// the window index into the key so each window starts from zero.
    async fn hit(&self, key: &str, window: Duration) -> CacheResult<u64>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Builds the counter key for `subject` in the window containing `now`.
///
/// Format: `rl:{scope}:{subject}:{window_index}`.
pub fn window_key(scope: &str, subject: &str, window: Duration, now: DateTime<Utc>) -> String {
    let window_secs = window.as_secs().max(1) as i64;
    let index = now.timestamp().div_euclid(window_secs);
    format!("rl:{}:{}:{}", scope, subject, index)
}
