//! Shared application state injected into every handler.

use chrono::Duration;
use std::sync::Arc;

use crate::application::services::{
    AnalyticsService, AttributionService, AuthService, MaintenanceService, RateLimiter,
    ResolverService,
};
use crate::domain::repositories::{
    ClickRepository, LinkRepository, MaintenanceRepository, TokenRepository,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geoip::GeoLookup;
use crate::infrastructure::rate_limit::RateLimitStore;

/// Scope name of the link creation limiter's counters.
pub const CREATE_LIMIT_SCOPE: &str = "create";

/// Repository handles the services are built from.
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

/// Tunables that shape service behavior.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token_signing_secret: String,
    pub dedupe_window: Duration,
    pub click_retention_days: i64,
    pub create_limit_per_minute: u64,
}

/// Application state shared across all request handlers.
///
/// Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub resolver_service: Arc<ResolverService<dyn LinkRepository>>,
    pub attribution_service: Arc<AttributionService<dyn ClickRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkRepository, dyn ClickRepository>>,
    pub maintenance_service: Arc<MaintenanceService<dyn MaintenanceRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub create_limiter: Arc<RateLimiter>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub geo: Arc<dyn GeoLookup>,
}

impl AppState {
    /// Wires services from repositories and adapters.
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        geo: Arc<dyn GeoLookup>,
        limit_store: Arc<dyn RateLimitStore>,
        settings: Settings,
    ) -> Self {
        let Repositories {
            links,
            clicks,
            maintenance,
            tokens,
        } = repositories;

        Self {
            resolver_service: Arc::new(ResolverService::new(links.clone(), cache.clone())),
            attribution_service: Arc::new(AttributionService::new(
                clicks.clone(),
                geo.clone(),
                settings.dedupe_window,
            )),
            analytics_service: Arc::new(AnalyticsService::new(links.clone(), clicks)),
            maintenance_service: Arc::new(MaintenanceService::new(
                maintenance,
                settings.click_retention_days,
            )),
            auth_service: Arc::new(AuthService::new(tokens, settings.token_signing_secret)),
            create_limiter: Arc::new(RateLimiter::new(
                limit_store,
                CREATE_LIMIT_SCOPE,
                settings.create_limit_per_minute,
                std::time::Duration::from_secs(60),
            )),
            link_repository: links,
            cache,
            geo,
        }
    }
}
