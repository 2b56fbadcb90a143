//! Redis fixed-window counters shared across instances.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::warn;

use super::store::RateLimitStore;
use crate::infrastructure::cache::{CacheError, CacheResult};

/// Counters kept in Redis with `INCR` + `EXPIRE` in one atomic pipeline.
pub struct RedisRateLimitStore {
    conn: ConnectionManager,
}

impl RedisRateLimitStore {
    /// Creates a store on an existing connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(&self, key: &str, window: Duration) -> CacheResult<u64> {
        let mut conn = self.conn.clone();
        let ttl = window.as_secs().max(1) as i64;

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, ttl)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!("Redis rate limit INCR failed for {}: {}", key, e);
                CacheError::OperationError(e.to_string())
            })?;

        Ok(count)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
