//! Repository trait for click attribution and click analytics.

use crate::domain::entities::{
    AffiliateClick, ClickOutcome, CountryClicks, DailyClicks, NewAffiliateClick,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Repository interface for affiliate clicks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_click.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click and updates the link's aggregate counter atomically.
    ///
    /// Within a single transaction:
    ///
    /// 1. Locks the link row so concurrent recorders for the same link
    ///    serialize
    /// 2. Looks for a counted click from the same IP on the same link newer
    ///    than `new_click.created_at - window`
    /// 3. Inserts the click row (always)
    /// 4. Increments `affiliate_links.clicks` only when step 2 found nothing
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Internal`] on database errors; nothing is written.
    async fn record_click(
        &self,
        new_click: NewAffiliateClick,
        window: Duration,
    ) -> Result<ClickOutcome, AppError>;

    /// Returns the newest `limit` clicks for a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn recent_clicks(&self, link_id: i64, limit: i64)
    -> Result<Vec<AffiliateClick>, AppError>;

    /// Returns per-day click counts (UTC days) for clicks at or after `since`.
    ///
    /// Days without clicks are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn daily_clicks(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError>;

    /// Returns click counts grouped by country for clicks at or after `since`,
    /// largest first. A missing country is reported as `"unknown"`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn country_breakdown(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<CountryClicks>, AppError>;

    /// Counts raw click rows for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError>;
}
