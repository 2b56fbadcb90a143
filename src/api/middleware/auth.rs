//! Bearer token guard for the analytics and maintenance API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
///
/// The raw token is HMAC-hashed and checked against non-revoked entries in
/// `api_tokens`; a successful check stamps `last_used_at`.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) when the
/// header is missing, malformed, unknown or revoked.
///
/// # Example
///
/// ```rust,ignore
/// let protected = api::routes::protected_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    state.auth_service.authenticate(&token).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
