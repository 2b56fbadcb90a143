//! Application layer services implementing business logic.
//!
//! Services consume repository traits and infrastructure adapters and expose
//! the operations HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::ResolverService`] - Slug resolution and lazy link creation
//! - [`services::AttributionService`] - Click recording with per-IP dedupe
//! - [`services::AnalyticsService`] - Per-link analytics
//! - [`services::MaintenanceService`] - Daily rollup and retention
//! - [`services::RateLimiter`] - Fixed-window request limiting
//! - [`services::AuthService`] - API token authentication

pub mod services;
