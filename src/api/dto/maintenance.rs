//! DTOs for the maintenance endpoint.

use serde::Serialize;

use crate::application::services::MaintenanceReport;

/// Outcome of `POST /api/maintenance/run`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResponse {
    pub rolled_up_days: u64,
    pub pruned_clicks: u64,
}

impl From<MaintenanceReport> for MaintenanceResponse {
    fn from(report: MaintenanceReport) -> Self {
        Self {
            rolled_up_days: report.rolled_up_days,
            pruned_clicks: report.pruned_clicks,
        }
    }
}
