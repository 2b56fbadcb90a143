//! Click entity representing a single visit through an affiliate link.

use chrono::{DateTime, Utc};

/// A recorded visit. Rows are append-only.
///
/// `counted` marks the visits that incremented the link's aggregate counter;
/// repeats inside the dedupe window are stored with `counted = false`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AffiliateClick {
    pub id: i64,
    pub link_id: i64,
    pub ip: String,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub counted: bool,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a click.
///
/// The timestamp is supplied by the caller so that the dedupe window is
/// evaluated against the same instant the row is written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAffiliateClick {
    pub link_id: i64,
    pub ip: String,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of an attribution transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub click: AffiliateClick,
    /// `true` when this click incremented the aggregate counter.
    pub counted: bool,
}
