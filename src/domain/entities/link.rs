//! Affiliate link entity representing a slug to destination mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored affiliate link with its aggregate click counter.
///
/// `clicks` only moves through the click repository's attribution
/// transaction; nothing else writes it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AffiliateLink {
    pub id: i64,
    pub slug: String,
    pub target_url: String,
    pub clicks: i64,
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AffiliateLink {
    /// Creates a new AffiliateLink instance.
    pub fn new(
        id: i64,
        slug: String,
        target_url: String,
        clicks: i64,
        is_manual: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            slug,
            target_url,
            clicks,
            is_manual,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Input data for creating a new affiliate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAffiliateLink {
    pub slug: String,
    pub target_url: String,
    pub is_manual: bool,
}

/// The minimal view of a link needed to redirect and attribute a click.
///
/// This is what the slug cache stores; it deliberately leaves out the
/// click counter, which would go stale in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub id: i64,
    pub slug: String,
    pub target_url: String,
}

impl From<&AffiliateLink> for LinkTarget {
    fn from(link: &AffiliateLink) -> Self {
        Self {
            id: link.id,
            slug: link.slug.clone(),
            target_url: link.target_url.clone(),
        }
    }
}
