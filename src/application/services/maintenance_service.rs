//! Click rollup and retention.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;

use crate::domain::repositories::MaintenanceRepository;
use crate::error::AppError;
use serde_json::json;
use tracing::info;

/// Result of one maintenance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// (link, day) rows written to `affiliate_daily_stats`.
    pub rolled_up_days: u64,
    /// Raw click rows deleted.
    pub pruned_clicks: u64,
}

/// Service compacting raw clicks into daily aggregates and pruning old rows.
pub struct MaintenanceService<M: MaintenanceRepository + ?Sized> {
    repository: Arc<M>,
    retention_days: i64,
}

impl<M: MaintenanceRepository + ?Sized> MaintenanceService<M> {
    /// Creates a new maintenance service keeping `retention_days` of raw clicks.
    pub fn new(repository: Arc<M>, retention_days: i64) -> Self {
        Self {
            repository,
            retention_days,
        }
    }

    /// Rolls up every complete UTC day before `now`, then prunes raw clicks
    /// older than the retention period.
    ///
    /// The prune cutoff is the start of a UTC day, so a day is either kept
    /// whole or deleted whole and its rollup row stays accurate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, or if the retention
    /// period reaches past the representable calendar; nothing is written
    /// then. A failed rollup skips the prune.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<MaintenanceReport, AppError> {
        let today = now.date_naive();

        let cutoff = Duration::try_days(self.retention_days)
            .and_then(|retention| today.checked_sub_signed(retention))
            .ok_or_else(|| {
                AppError::internal(
                    "Retention period out of range",
                    json!({ "retention_days": self.retention_days }),
                )
            })?
            .and_time(NaiveTime::MIN)
            .and_utc();

        let rolled_up_days = self.repository.rollup_before(today).await?;

        let pruned_clicks = self.repository.prune_before(cutoff).await?;

        info!(
            rolled_up_days,
            pruned_clicks,
            cutoff = %cutoff,
            "Maintenance run complete"
        );

        Ok(MaintenanceReport {
            rolled_up_days,
            pruned_clicks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMaintenanceRepository;
    use chrono::{NaiveDate, TimeZone};
    use mockall::Sequence;
    use serde_json::json;

    #[tokio::test]
    async fn test_run_rolls_up_then_prunes() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 13, 45, 0).unwrap();
        let mut seq = Sequence::new();
        let mut repo = MockMaintenanceRepository::new();

        repo.expect_rollup_before()
            .withf(|day| *day == NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(12));
        repo.expect_prune_before()
            .withf(|cutoff| *cutoff == Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(340));

        let report = MaintenanceService::new(Arc::new(repo), 365)
            .run(now)
            .await
            .unwrap();

        assert_eq!(
            report,
            MaintenanceReport {
                rolled_up_days: 12,
                pruned_clicks: 340
            }
        );
    }

    #[tokio::test]
    async fn test_oversized_retention_is_an_error() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();

        for retention_days in [100_000_000, i64::MAX] {
            let mut repo = MockMaintenanceRepository::new();
            repo.expect_rollup_before().times(0);
            repo.expect_prune_before().times(0);

            let result = MaintenanceService::new(Arc::new(repo), retention_days)
                .run(now)
                .await;

            assert!(matches!(result, Err(AppError::Internal { .. })));
        }
    }

    #[tokio::test]
    async fn test_rollup_failure_skips_prune() {
        let mut repo = MockMaintenanceRepository::new();
        repo.expect_rollup_before()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        repo.expect_prune_before().times(0);

        let result = MaintenanceService::new(Arc::new(repo), 365)
            .run(Utc::now())
            .await;

        assert!(result.is_err());
    }
}
