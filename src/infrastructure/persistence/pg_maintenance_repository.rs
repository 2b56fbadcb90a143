//! PostgreSQL implementation of the maintenance repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::MaintenanceRepository;
use crate::error::AppError;

/// PostgreSQL repository for click rollup and pruning.
pub struct PgMaintenanceRepository {
    pool: Arc<PgPool>,
}

impl PgMaintenanceRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for PgMaintenanceRepository {
    async fn rollup_before(&self, before_day: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO affiliate_daily_stats (link_id, day, clicks, unique_visitors)
            SELECT
                link_id,
                (created_at AT TIME ZONE 'UTC')::date AS day,
                COUNT(*),
                COUNT(DISTINCT ip)
            FROM affiliate_clicks
            WHERE (created_at AT TIME ZONE 'UTC')::date < $1
            GROUP BY link_id, day
            ON CONFLICT (link_id, day) DO UPDATE
            SET clicks = EXCLUDED.clicks,
                unique_visitors = EXCLUDED.unique_visitors
            "#,
        )
        .bind(before_day)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM affiliate_clicks WHERE created_at < $1")
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
