//! PostgreSQL implementation of the affiliate link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AffiliateLink, NewAffiliateLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, slug, target_url, clicks, is_manual, created_at, updated_at";

/// PostgreSQL repository for affiliate links.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewAffiliateLink) -> Result<AffiliateLink, AppError> {
        if new_link.is_manual {
            let link = sqlx::query_as::<_, AffiliateLink>(&format!(
                r#"
                INSERT INTO affiliate_links (slug, target_url, is_manual)
                VALUES ($1, $2, TRUE)
                RETURNING {LINK_COLUMNS}
                "#
            ))
            .bind(&new_link.slug)
            .bind(&new_link.target_url)
            .fetch_one(self.pool.as_ref())
            .await?;

            return Ok(link);
        }

        let inserted = sqlx::query_as::<_, AffiliateLink>(&format!(
            r#"
            INSERT INTO affiliate_links (slug, target_url, is_manual)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (target_url) WHERE NOT is_manual DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.slug)
        .bind(&new_link.target_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(link) = inserted {
            return Ok(link);
        }

        // A concurrent request created the auto link for this URL first.
        let existing = sqlx::query_as::<_, AffiliateLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM affiliate_links WHERE target_url = $1 AND NOT is_manual"
        ))
        .bind(&new_link.target_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        existing.ok_or_else(|| {
            AppError::internal(
                "Auto link vanished after insert conflict",
                json!({ "target_url": new_link.target_url }),
            )
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<AffiliateLink>, AppError> {
        let link = sqlx::query_as::<_, AffiliateLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM affiliate_links WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_target_url(
        &self,
        target_url: &str,
    ) -> Result<Option<AffiliateLink>, AppError> {
        let link = sqlx::query_as::<_, AffiliateLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM affiliate_links
            WHERE target_url = $1
            ORDER BY id
            LIMIT 1
            "#
        ))
        .bind(target_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<AffiliateLink>, AppError> {
        let offset = (page - 1) * page_size;

        let links = sqlx::query_as::<_, AffiliateLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM affiliate_links
            ORDER BY clicks DESC, id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM affiliate_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
