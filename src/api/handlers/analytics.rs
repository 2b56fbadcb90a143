//! Handler for per-link analytics.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::analytics::{AnalyticsQuery, LinkAnalyticsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns link detail, the last 50 clicks, a zero-filled daily series and a
/// country breakdown.
///
/// # Endpoint
///
/// `GET /api/affiliate-links/{slug}?days=30`
///
/// # Query Parameters
///
/// - `days` (optional): Length of the daily series (default: 30, range: 1..=365)
///
/// # Errors
///
/// Returns 400 Bad Request if `days` is not a number in range.
/// Returns 401 Unauthorized without a valid Bearer token.
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn link_analytics_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<LinkAnalyticsResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::bad_request("Invalid query string", json!({ "reason": e.body_text() }))
    })?;

    let analytics = state
        .analytics_service
        .link_analytics(&slug, query.days, Utc::now())
        .await?;

    Ok(Json(analytics.into()))
}
