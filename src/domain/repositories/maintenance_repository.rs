//! Repository trait for click rollup and retention.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Repository interface for periodic click maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Upserts `affiliate_daily_stats` from raw clicks for every UTC day
    /// strictly before `before_day`.
    ///
    /// Re-running replaces the totals of each day still present in the raw
    /// table, so the operation is idempotent.
    ///
    /// Returns the number of (link, day) rows written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn rollup_before(&self, before_day: NaiveDate) -> Result<u64, AppError>;

    /// Deletes raw clicks created before `cutoff`.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
