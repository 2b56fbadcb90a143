//! Fixed-window limit on lazy link creation.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{error::AppError, state::AppState, utils::client_ip::client_ip};

/// Counts the request against the caller's per-minute creation budget.
///
/// The caller is identified the same way clicks are attributed (first
/// `X-Forwarded-For` entry and fallbacks), and counters live in the shared
/// store so the limit holds across instances.
///
/// # Errors
///
/// Returns `429 Too Many Requests` once the budget for the current minute is
/// spent. A store outage lets requests through.
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(req.headers());

    state.create_limiter.check(&ip, Utc::now()).await?;

    Ok(next.run(req).await)
}
