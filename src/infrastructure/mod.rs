//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain layer and the adapters the
//! services depend on.
//!
//! # Modules
//!
//! - [`cache`] - Slug lookup cache (Redis and no-op implementations)
//! - [`geoip`] - IP to country lookup
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rate_limit`] - Fixed-window counter stores

pub mod cache;
pub mod geoip;
pub mod persistence;
pub mod rate_limit;
