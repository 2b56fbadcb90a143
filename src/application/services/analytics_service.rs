//! Read-only per-link analytics.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::{
    AffiliateClick, AffiliateLink, CountryClicks, DailyClicks, fill_daily_series,
};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// Number of raw clicks returned with a link.
pub const RECENT_CLICKS_LIMIT: i64 = 50;

/// Default length of the daily series.
pub const DEFAULT_DAYS: u32 = 30;

/// Longest accepted daily series.
pub const MAX_DAYS: u32 = 365;

/// Everything shown for one link.
#[derive(Debug, Clone)]
pub struct LinkAnalytics {
    pub link: AffiliateLink,
    pub recent_clicks: Vec<AffiliateClick>,
    /// One entry per UTC day, oldest first, zero-filled.
    pub daily: Vec<DailyClicks>,
    pub countries: Vec<CountryClicks>,
    pub days: u32,
}

/// Service assembling link detail, recent clicks and aggregates.
pub struct AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L, C> AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    /// Creates a new analytics service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Returns analytics for `slug` covering the trailing `days` UTC days
    /// (today included).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `days` is outside `1..=365`.
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn link_analytics(
        &self,
        slug: &str,
        days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<LinkAnalytics, AppError> {
        let days = days.unwrap_or(DEFAULT_DAYS);
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(AppError::bad_request(
                format!("days must be between 1 and {}", MAX_DAYS),
                json!({ "days": days }),
            ));
        }

        let link = self
            .link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Affiliate link not found", json!({ "slug": slug }))
            })?;

        let last_day = now.date_naive();
        let first_day = last_day - Duration::days(i64::from(days) - 1);
        let since = first_day.and_time(chrono::NaiveTime::MIN).and_utc();

        let recent_clicks = self
            .click_repository
            .recent_clicks(link.id, RECENT_CLICKS_LIMIT)
            .await?;
        let counts = self.click_repository.daily_clicks(link.id, since).await?;
        let countries = self
            .click_repository
            .country_breakdown(link.id, since)
            .await?;

        Ok(LinkAnalytics {
            daily: fill_daily_series(&counts, first_day, last_day),
            link,
            recent_clicks,
            countries,
            days,
        })
    }
}
