//! Fixed-window rate limit counters.
//!
//! - [`RedisRateLimitStore`] - Shared counters in Redis
//! - [`MemoryRateLimitStore`] - Process-local fallback

mod memory_store;
mod redis_store;
mod store;

pub use memory_store::MemoryRateLimitStore;
pub use redis_store::RedisRateLimitStore;
pub use store::{RateLimitStore, window_key};
