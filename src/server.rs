//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and geolocation setup, and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geoip::{ExternalApiGeoLookup, GeoLookup, NullGeoLookup};
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgMaintenanceRepository, PgTokenRepository,
};
use crate::infrastructure::rate_limit::{
    MemoryRateLimitStore, RateLimitStore, RedisRateLimitStore,
};
use crate::routes::app_router;
use crate::state::{AppState, Repositories, Settings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the PostgreSQL pool from the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache and shared rate limit counters (or in-process fallbacks)
/// - Geolocation provider
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let (cache, limit_store) = connect_redis(&config).await;

    let geo: Arc<dyn GeoLookup> = if config.geoip_enabled {
        tracing::info!("GeoIP enabled (external API)");
        Arc::new(ExternalApiGeoLookup::new(
            &config.geoip_api_url,
            Duration::from_millis(config.geoip_timeout_ms),
            Duration::from_secs(config.geoip_cache_ttl_seconds),
        ))
    } else {
        tracing::info!("GeoIP disabled");
        Arc::new(NullGeoLookup)
    };

    let pool = Arc::new(pool);
    let repositories = Repositories {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        clicks: Arc::new(PgClickRepository::new(pool.clone())),
        maintenance: Arc::new(PgMaintenanceRepository::new(pool.clone())),
        tokens: Arc::new(PgTokenRepository::new(pool)),
    };

    let settings = Settings {
        token_signing_secret: config.token_signing_secret.clone(),
        dedupe_window: chrono::Duration::hours(config.dedupe_window_hours),
        click_retention_days: config.click_retention_days,
        create_limit_per_minute: config.rate_limit_create_per_minute,
    };

    let state = AppState::new(repositories, cache, geo, limit_store, settings);

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Connects Redis for both the slug cache and rate limit counters.
///
/// Falls back to [`NullCache`] and [`MemoryRateLimitStore`] when Redis is not
/// configured or unreachable.
async fn connect_redis(config: &Config) -> (Arc<dyn CacheService>, Arc<dyn RateLimitStore>) {
    let fallback = || -> (Arc<dyn CacheService>, Arc<dyn RateLimitStore>) {
        (
            Arc::new(NullCache::new()),
            Arc::new(MemoryRateLimitStore::new(Duration::from_secs(120))),
        )
    };

    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache), rate limit counters in memory");
        return fallback();
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis), rate limit counters in Redis");
            let store: Arc<dyn RateLimitStore> =
                Arc::new(RedisRateLimitStore::new(redis.connection()));
            let cache: Arc<dyn CacheService> = Arc::new(redis);
            (cache, store)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using NullCache and in-memory counters.",
                e
            );
            fallback()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
