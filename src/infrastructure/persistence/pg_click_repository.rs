//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    AffiliateClick, ClickOutcome, CountryClicks, DailyClicks, NewAffiliateClick,
};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use serde_json::json;

/// PostgreSQL repository for click attribution and analytics.
///
/// The attribution write path takes a row lock on the link, so increments of
/// a popular link's counter serialize instead of racing.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(
        &self,
        new_click: NewAffiliateClick,
        window: Duration,
    ) -> Result<ClickOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM affiliate_links WHERE id = $1 FOR UPDATE")
                .bind(new_click.link_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Affiliate link not found",
                json!({ "link_id": new_click.link_id }),
            ));
        }

        let window_start = new_click.created_at - window;
        let already_counted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM affiliate_clicks
                WHERE link_id = $1
                  AND ip = $2
                  AND counted
                  AND created_at > $3
            )
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip)
        .bind(window_start)
        .fetch_one(&mut *tx)
        .await?;

        let counted = !already_counted;

        let click = sqlx::query_as::<_, AffiliateClick>(
            r#"
            INSERT INTO affiliate_clicks (link_id, ip, country, user_agent, counted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, ip, country, user_agent, counted, created_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip)
        .bind(&new_click.country)
        .bind(&new_click.user_agent)
        .bind(counted)
        .bind(new_click.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if counted {
            sqlx::query(
                r#"
                UPDATE affiliate_links
                SET clicks = clicks + 1, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(new_click.link_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ClickOutcome { click, counted })
    }

    async fn recent_clicks(
        &self,
        link_id: i64,
        limit: i64,
    ) -> Result<Vec<AffiliateClick>, AppError> {
        let clicks = sqlx::query_as::<_, AffiliateClick>(
            r#"
            SELECT id, link_id, ip, country, user_agent, counted, created_at
            FROM affiliate_clicks
            WHERE link_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn daily_clicks(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let rows = sqlx::query_as::<_, DailyClicks>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS clicks
            FROM affiliate_clicks
            WHERE link_id = $1
              AND created_at >= $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn country_breakdown(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<CountryClicks>, AppError> {
        let rows = sqlx::query_as::<_, CountryClicks>(
            r#"
            SELECT COALESCE(country, 'unknown') AS country, COUNT(*) AS clicks
            FROM affiliate_clicks
            WHERE link_id = $1
              AND created_at >= $2
            GROUP BY 1
            ORDER BY clicks DESC, country
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM affiliate_clicks WHERE link_id = $1")
                .bind(link_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
