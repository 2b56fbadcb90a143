#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use affiliate_redirect::application::services::auth_service::hash_token;
use affiliate_redirect::domain::entities::{
    AffiliateClick, AffiliateDailyStat, AffiliateLink, ClickOutcome, CountryClicks, DailyClicks,
    NewAffiliateClick, NewAffiliateLink,
};
use affiliate_redirect::domain::repositories::{
    ApiToken, ClickRepository, LinkRepository, MaintenanceRepository, TokenRepository,
};
use affiliate_redirect::error::AppError;
use affiliate_redirect::infrastructure::cache::NullCache;
use affiliate_redirect::infrastructure::geoip::NullGeoLookup;
use affiliate_redirect::infrastructure::rate_limit::MemoryRateLimitStore;
use affiliate_redirect::state::{AppState, Repositories, Settings};

pub const TEST_SECRET: &str = "test-signing-secret";

/// In-memory stand-in for the PostgreSQL repositories.
///
/// Mirrors the SQL semantics the handlers rely on: unique slugs, the
/// counted-click dedupe lookup and the conditional counter increment.
#[derive(Default)]
pub struct MemoryDb {
    links: Mutex<Vec<AffiliateLink>>,
    clicks: Mutex<Vec<AffiliateClick>>,
    daily_stats: Mutex<Vec<AffiliateDailyStat>>,
    tokens: Mutex<Vec<ApiToken>>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn links(&self) -> Vec<AffiliateLink> {
        self.links.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<AffiliateClick> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn daily_stats(&self) -> Vec<AffiliateDailyStat> {
        self.daily_stats.lock().unwrap().clone()
    }

    pub fn link(&self, slug: &str) -> Option<AffiliateLink> {
        self.links().into_iter().find(|l| l.slug == slug)
    }

    pub fn clicks_for(&self, link_id: i64) -> Vec<AffiliateClick> {
        self.clicks()
            .into_iter()
            .filter(|c| c.link_id == link_id)
            .collect()
    }

    pub fn seed_link(&self, slug: &str, target_url: &str) -> AffiliateLink {
        let mut links = self.links.lock().unwrap();
        let link = AffiliateLink::new(
            links.len() as i64 + 1,
            slug.to_string(),
            target_url.to_string(),
            0,
            true,
            Utc::now(),
        );
        links.push(link.clone());
        link
    }

    /// Inserts a raw click directly, bypassing dedupe.
    pub fn seed_click(&self, link_id: i64, ip: &str, country: Option<&str>, at: DateTime<Utc>) {
        let mut clicks = self.clicks.lock().unwrap();
        let id = clicks.len() as i64 + 1;
        clicks.push(AffiliateClick {
            id,
            link_id,
            ip: ip.to_string(),
            country: country.map(str::to_string),
            user_agent: None,
            counted: true,
            created_at: at,
        });
    }

    /// Stores a token and returns the raw value to send as Bearer.
    pub fn seed_token(&self, name: &str) -> String {
        let raw = format!("raw-token-{}", name);
        let mut tokens = self.tokens.lock().unwrap();
        let id = tokens.len() as i64 + 1;
        tokens.push(ApiToken {
            id,
            name: name.to_string(),
            token_hash: hash_token(TEST_SECRET, &raw),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        });
        raw
    }

    pub fn revoke_all_tokens(&self) {
        for token in self.tokens.lock().unwrap().iter_mut() {
            token.revoked_at = Some(Utc::now());
        }
    }
}

#[async_trait]
impl LinkRepository for MemoryDb {
    async fn create(&self, new_link: NewAffiliateLink) -> Result<AffiliateLink, AppError> {
        let mut links = self.links.lock().unwrap();
        if !new_link.is_manual {
            if let Some(existing) = links
                .iter()
                .find(|l| !l.is_manual && l.target_url == new_link.target_url)
            {
                return Ok(existing.clone());
            }
        }
        if links.iter().any(|l| l.slug == new_link.slug) {
            return Err(AppError::conflict(
                "Resource already exists",
                json!({ "constraint": "affiliate_links_slug_key" }),
            ));
        }

        let link = AffiliateLink::new(
            links.len() as i64 + 1,
            new_link.slug,
            new_link.target_url,
            0,
            new_link.is_manual,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<AffiliateLink>, AppError> {
        Ok(self.link(slug))
    }

    async fn find_by_target_url(
        &self,
        target_url: &str,
    ) -> Result<Option<AffiliateLink>, AppError> {
        Ok(self.links().into_iter().find(|l| l.target_url == target_url))
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<AffiliateLink>, AppError> {
        let mut links = self.links();
        links.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.id.cmp(&b.id)));
        Ok(links
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl ClickRepository for MemoryDb {
    async fn record_click(
        &self,
        new_click: NewAffiliateClick,
        window: Duration,
    ) -> Result<ClickOutcome, AppError> {
        let mut links = self.links.lock().unwrap();
        let Some(link) = links.iter_mut().find(|l| l.id == new_click.link_id) else {
            return Err(AppError::not_found(
                "Affiliate link not found",
                json!({ "link_id": new_click.link_id }),
            ));
        };

        let mut clicks = self.clicks.lock().unwrap();
        let window_start = new_click.created_at - window;
        let already_counted = clicks.iter().any(|c| {
            c.link_id == new_click.link_id
                && c.ip == new_click.ip
                && c.counted
                && c.created_at > window_start
        });
        let counted = !already_counted;

        let click = AffiliateClick {
            id: clicks.len() as i64 + 1,
            link_id: new_click.link_id,
            ip: new_click.ip,
            country: new_click.country,
            user_agent: new_click.user_agent,
            counted,
            created_at: new_click.created_at,
        };
        clicks.push(click.clone());

        if counted {
            link.clicks += 1;
        }

        Ok(ClickOutcome { click, counted })
    }

    async fn recent_clicks(
        &self,
        link_id: i64,
        limit: i64,
    ) -> Result<Vec<AffiliateClick>, AppError> {
        let mut clicks = self.clicks_for(link_id);
        clicks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        clicks.truncate(limit as usize);
        Ok(clicks)
    }

    async fn daily_clicks(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for click in self.clicks_for(link_id) {
            if click.created_at >= since {
                *by_day.entry(click.created_at.date_naive()).or_default() += 1;
            }
        }
        Ok(by_day
            .into_iter()
            .map(|(day, clicks)| DailyClicks { day, clicks })
            .collect())
    }

    async fn country_breakdown(
        &self,
        link_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<CountryClicks>, AppError> {
        let mut by_country: BTreeMap<String, i64> = BTreeMap::new();
        for click in self.clicks_for(link_id) {
            if click.created_at >= since {
                let country = click.country.unwrap_or_else(|| "unknown".to_string());
                *by_country.entry(country).or_default() += 1;
            }
        }
        let mut rows: Vec<CountryClicks> = by_country
            .into_iter()
            .map(|(country, clicks)| CountryClicks { country, clicks })
            .collect();
        rows.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.country.cmp(&b.country)));
        Ok(rows)
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self.clicks_for(link_id).len() as i64)
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryDb {
    async fn rollup_before(&self, before_day: NaiveDate) -> Result<u64, AppError> {
        let mut groups: BTreeMap<(i64, NaiveDate), (i64, HashSet<String>)> = BTreeMap::new();
        for click in self.clicks() {
            let day = click.created_at.date_naive();
            if day < before_day {
                let entry = groups.entry((click.link_id, day)).or_default();
                entry.0 += 1;
                entry.1.insert(click.ip);
            }
        }

        let mut stats = self.daily_stats.lock().unwrap();
        for ((link_id, day), (clicks, ips)) in &groups {
            stats.retain(|s| !(s.link_id == *link_id && s.day == *day));
            stats.push(AffiliateDailyStat {
                link_id: *link_id,
                day: *day,
                clicks: *clicks,
                unique_visitors: ips.len() as i64,
            });
        }

        Ok(groups.len() as u64)
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        let before = clicks.len();
        clicks.retain(|c| c.created_at >= cutoff);
        Ok((before - clicks.len()) as u64)
    }
}

#[async_trait]
impl TokenRepository for MemoryDb {
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.token_hash == token_hash && t.revoked_at.is_none()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.token_hash == token_hash {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({ "id": id }),
            )),
        }
    }
}

pub fn test_settings() -> Settings {
    Settings {
        token_signing_secret: TEST_SECRET.to_string(),
        dedupe_window: Duration::hours(24),
        click_retention_days: 365,
        create_limit_per_minute: 30,
    }
}

pub fn create_test_state(db: Arc<MemoryDb>) -> AppState {
    create_test_state_with(db, test_settings())
}

pub fn create_test_state_with(db: Arc<MemoryDb>, settings: Settings) -> AppState {
    let repositories = Repositories {
        links: db.clone(),
        clicks: db.clone(),
        maintenance: db.clone(),
        tokens: db,
    };

    AppState::new(
        repositories,
        Arc::new(NullCache::new()),
        Arc::new(NullGeoLookup),
        Arc::new(MemoryRateLimitStore::new(std::time::Duration::from_secs(120))),
        settings,
    )
}
