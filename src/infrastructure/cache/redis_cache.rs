//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::LinkTarget;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for slug lookups.
///
/// Entries are JSON-encoded [`LinkTarget`]s under `aff:{slug}`. All operations
/// are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_link`]
    ///   is called with `ttl_seconds = None`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "aff:".to_string(),
        })
    }

    /// Returns a handle to the shared connection, for other Redis-backed stores.
    pub fn connection(&self) -> ConnectionManager {
        self.client.clone()
    }

    fn build_key(&self, slug: &str) -> String {
        format!("{}{}", self.key_prefix, slug)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, slug: &str) -> CacheResult<Option<LinkTarget>> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LinkTarget>(&raw) {
                Ok(target) => {
                    debug!("Cache HIT: {}", slug);
                    Ok(Some(target))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {}: {}", slug, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", slug);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", slug, e);
                Ok(None)
            }
        }
    }

    async fn set_link(&self, target: &LinkTarget, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let key = self.build_key(&target.slug);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(target)
            .map_err(|e| CacheError::OperationError(e.to_string()))?;

        match conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", target.slug, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", target.slug, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, slug: &str) -> CacheResult<()> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", slug);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", slug, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
