//! Repository trait for affiliate link data access.

use crate::domain::entities::{AffiliateLink, NewAffiliateLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for affiliate links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link with a zero click counter.
    ///
    /// Auto-created links (`is_manual == false`) are unique per target URL:
    /// if one already exists for `new_link.target_url`, that link is returned
    /// and nothing is inserted, whatever slug was requested.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewAffiliateLink) -> Result<AffiliateLink, AppError>;

    /// Finds a link by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<AffiliateLink>, AppError>;

    /// Finds the oldest link pointing at exactly `target_url`.
    ///
    /// Used to reuse an auto-created link instead of minting a new slug for
    /// the same destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_target_url(&self, target_url: &str)
    -> Result<Option<AffiliateLink>, AppError>;

    /// Lists links, most clicked first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<AffiliateLink>, AppError>;

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
