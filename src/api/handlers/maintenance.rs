//! Handler for the maintenance job.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::api::dto::maintenance::MaintenanceResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Rolls raw clicks up into daily stats and prunes expired raw clicks.
///
/// # Endpoint
///
/// `POST /api/maintenance/run`
///
/// # Response
///
/// ```json
/// { "rolledUpDays": 12, "prunedClicks": 340 }
/// ```
///
/// Safe to call repeatedly; the rollup overwrites each day's totals.
pub async fn run_maintenance_handler(
    State(state): State<AppState>,
) -> Result<Json<MaintenanceResponse>, AppError> {
    let report = state.maintenance_service.run(Utc::now()).await?;
    Ok(Json(report.into()))
}
