//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::LinkTarget;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching slug lookups on the redirect path.
///
/// Implementations must be fail-open: a broken cache degrades to database
/// lookups and never fails a redirect.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached target for a slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(target))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_link(&self, slug: &str) -> CacheResult<Option<LinkTarget>>;

    /// Stores a slug lookup with optional TTL in seconds
    /// (implementation default if `None`).
    async fn set_link(&self, target: &LinkTarget, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached slug.
    async fn invalidate(&self, slug: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend_name(&self) -> &'static str;
}
