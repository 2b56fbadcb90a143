//! Handlers for slug redirects and the JSON redirect contract.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::debug;
use validator::Validate;

use crate::api::dto::redirect::{RedirectResponse, ResolveQuery};
use crate::domain::entities::{LinkTarget, Visitor};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, user_agent};

/// Redirects a slug to its target URL and records the click.
///
/// # Endpoints
///
/// - `GET /{slug}`
/// - `GET /out/{slug}`
///
/// # Request Flow
///
/// 1. Resolve slug (cache, then database)
/// 2. Record the click; counted at most once per IP per dedupe window
/// 3. Return `302 Found` with `Location` set to the stored target URL
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
/// Returns 500 if the click cannot be stored; the visitor is not redirected
/// untracked.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let target = state.resolver_service.resolve_slug(&slug).await?;

    track(&state, &target, &headers).await?;

    let location = HeaderValue::from_str(&target.target_url).map_err(|_| {
        AppError::internal(
            "Stored target URL is not a valid header value",
            json!({ "slug": target.slug }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Resolves or lazily creates a link for an external URL and records the click.
///
/// # Endpoint
///
/// `GET /api/redirect?u=<url>`
///
/// # Response
///
/// ```json
/// { "targetUrl": "https://example.com/path", "slug": "example.com-path", "linkId": 1 }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `u` is missing, malformed or not http/https;
/// no link is created in that case.
/// Returns 429 Too Many Requests when the caller exceeds the creation limit.
pub async fn resolve_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<Json<RedirectResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::bad_request("Invalid query string", json!({ "reason": e.body_text() }))
    })?;
    query.validate()?;

    let url = query
        .u
        .as_deref()
        .ok_or_else(|| AppError::bad_request("Missing required parameter 'u'", json!({})))?;

    let target = state.resolver_service.resolve_or_create(url).await?;

    track(&state, &target, &headers).await?;

    Ok(Json(target.into()))
}

/// Resolves an existing slug and records the click, returning JSON.
///
/// # Endpoint
///
/// `GET /api/redirect/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn resolve_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RedirectResponse>, AppError> {
    let target = state.resolver_service.resolve_slug(&slug).await?;

    track(&state, &target, &headers).await?;

    Ok(Json(target.into()))
}

async fn track(state: &AppState, target: &LinkTarget, headers: &HeaderMap) -> Result<(), AppError> {
    let visitor = Visitor::new(client_ip(headers), user_agent(headers));

    let outcome = state
        .attribution_service
        .record(target.id, &visitor, Utc::now())
        .await?;

    metrics::counter!("affiliate_redirects_total").increment(1);
    debug!(
        slug = %target.slug,
        counted = outcome.counted,
        "Redirect resolved"
    );

    Ok(())
}
