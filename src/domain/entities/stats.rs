//! Aggregated click statistics.

use chrono::NaiveDate;
use serde::Serialize;

/// Clicks on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DailyClicks {
    pub day: NaiveDate,
    pub clicks: i64,
}

/// Clicks attributed to one country (`"unknown"` when geolocation failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CountryClicks {
    pub country: String,
    pub clicks: i64,
}

/// A row of the `affiliate_daily_stats` rollup table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AffiliateDailyStat {
    pub link_id: i64,
    pub day: NaiveDate,
    pub clicks: i64,
    pub unique_visitors: i64,
}

/// Fills in zero-click days so the series covers `[first_day, last_day]`.
///
/// `counts` may be sparse and unordered; days outside the range are dropped.
pub fn fill_daily_series(
    counts: &[DailyClicks],
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> Vec<DailyClicks> {
    first_day
        .iter_days()
        .take_while(|day| *day <= last_day)
        .map(|day| DailyClicks {
            day,
            clicks: counts
                .iter()
                .filter(|c| c.day == day)
                .map(|c| c.clicks)
                .sum(),
        })
        .collect()
}
