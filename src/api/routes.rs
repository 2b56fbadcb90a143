//! API route configuration.

use crate::api::handlers::{
    link_analytics_handler, resolve_slug_handler, resolve_url_handler, run_maintenance_handler,
};
use crate::api::middleware::{auth, create_limit};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Public JSON redirect routes.
///
/// # Endpoints
///
/// - `GET /redirect?u=<url>` - Resolve or create a link (creation limit applies)
/// - `GET /redirect/{slug}`  - Resolve an existing slug
pub fn public_routes(state: AppState) -> Router<AppState> {
    let create = Router::new()
        .route("/redirect", get(resolve_url_handler))
        .route_layer(middleware::from_fn_with_state(state, create_limit::layer));

    Router::new()
        .merge(create)
        .route("/redirect/{slug}", get(resolve_slug_handler))
}

/// Operator routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /affiliate-links/{slug}` - Link analytics
/// - `POST /maintenance/run`        - Daily rollup and retention prune
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/affiliate-links/{slug}", get(link_analytics_handler))
        .route("/maintenance/run", post(run_maintenance_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
