//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Affiliate link lookup and creation
//! - [`ClickRepository`] - Click attribution and click analytics
//! - [`MaintenanceRepository`] - Daily rollup and retention pruning
//! - [`TokenRepository`] - API token authentication

pub mod click_repository;
pub mod link_repository;
pub mod maintenance_repository;
pub mod token_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use maintenance_repository::MaintenanceRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use maintenance_repository::MockMaintenanceRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
