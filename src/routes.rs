//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`                   - Redirect (302) and record click
//! - `GET  /out/{slug}`               - Same as `/{slug}`
//! - `GET  /health`                   - Health check: database, cache, geolocation
//! - `GET  /api/redirect?u=`          - JSON resolve-or-create (rate limited)
//! - `GET  /api/redirect/{slug}`      - JSON resolve
//! - `GET  /api/affiliate-links/{slug}` - Analytics (Bearer token)
//! - `POST /api/maintenance/run`      - Maintenance (Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on everything, fixed window on link creation
//! - **Authentication** - Bearer token on operator routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds all routes with their per-route middleware, without the outer
/// token bucket or tracing layers.
///
/// Tests drive this router directly since it needs no socket peer address.
pub fn routes(state: AppState) -> Router {
    let api_router = Router::new()
        .merge(api::routes::public_routes(state.clone()))
        .merge(api::routes::protected_routes(state.clone()));

    Router::new()
        .route("/health", get(health_handler))
        .route("/out/{slug}", get(redirect_handler))
        .route("/{slug}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
}

/// Constructs the production router.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, the token bucket keys on forwarded
///   headers instead of the peer socket address
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = rate_limit::apply(routes(state), behind_proxy).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
