//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Affiliate link storage and lookup
//! - [`PgClickRepository`] - Transactional click attribution and analytics queries
//! - [`PgMaintenanceRepository`] - Daily rollup and retention pruning
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_maintenance_repository;
pub mod pg_token_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_maintenance_repository::PgMaintenanceRepository;
pub use pg_token_repository::PgTokenRepository;
