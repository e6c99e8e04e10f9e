//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use tidecast_core::series::SeriesPoint;
use tidecast_core::utils::time_utils::{format_iso_millis, start_of_day_utc};

/// One row of `GET /historical_data/{entity}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub ds: String,
    pub y: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&SeriesPoint> for HistoryPoint {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            ds: format_iso_millis(&start_of_day_utc(point.ds)),
            y: point.y,
            created_at: format_iso_millis(&point.created_at),
            updated_at: format_iso_millis(&point.updated_at),
        }
    }
}

/// Body of `POST /trigger_monthly_update/{entity}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyUpdateRequest {
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub month: Option<i64>,
}
