//! DTOs for the link analytics endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::LinkAnalytics;
use crate::domain::entities::{AffiliateClick, AffiliateLink, CountryClicks, DailyClicks};

/// Query for `GET /api/affiliate-links/{slug}`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub days: Option<u32>,
}

/// Link detail with clicks and aggregates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalyticsResponse {
    pub link: LinkItem,
    pub recent_clicks: Vec<ClickItem>,
    pub daily: Vec<DailyItem>,
    pub countries: Vec<CountryItem>,
    pub days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub id: i64,
    pub slug: String,
    pub target_url: String,
    pub clicks: i64,
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single raw click.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickItem {
    pub id: i64,
    pub ip: String,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub counted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DailyItem {
    pub day: NaiveDate,
    pub clicks: i64,
}

#[derive(Debug, Serialize)]
pub struct CountryItem {
    pub country: String,
    pub clicks: i64,
}

impl From<AffiliateLink> for LinkItem {
    fn from(link: AffiliateLink) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            target_url: link.target_url,
            clicks: link.clicks,
            is_manual: link.is_manual,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

impl From<AffiliateClick> for ClickItem {
    fn from(click: AffiliateClick) -> Self {
        Self {
            id: click.id,
            ip: click.ip,
            country: click.country,
            user_agent: click.user_agent,
            counted: click.counted,
            created_at: click.created_at,
        }
    }
}

impl From<DailyClicks> for DailyItem {
    fn from(d: DailyClicks) -> Self {
        Self {
            day: d.day,
            clicks: d.clicks,
        }
    }
}

impl From<CountryClicks> for CountryItem {
    fn from(c: CountryClicks) -> Self {
        Self {
            country: c.country,
            clicks: c.clicks,
        }
    }
}

impl From<LinkAnalytics> for LinkAnalyticsResponse {
    fn from(analytics: LinkAnalytics) -> Self {
        Self {
            link: analytics.link.into(),
            recent_clicks: analytics.recent_clicks.into_iter().map(Into::into).collect(),
            daily: analytics.daily.into_iter().map(Into::into).collect(),
            countries: analytics.countries.into_iter().map(Into::into).collect(),
            days: analytics.days,
        }
    }
}
