//! Update domain models.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FORECAST_HORIZON, DEFAULT_MIN_POINTS, DEFAULT_WINDOW_DAYS};

/// Terminal state of one update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// Nothing usable came in; stored data untouched.
    NoData,
    /// Data stored, but the series is below the retrain threshold.
    InsufficientData,
    Retrained,
    RetrainFailed,
    /// A remote pull was requested without a record store.
    NotConfigured,
    /// The series or forecast could not be written.
    StorageFailed,
}

/// Result of every orchestration operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub status: UpdateStatus,
    pub message: String,
}

impl UpdateOutcome {
    pub fn success(status: UpdateStatus, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
        }
    }

    pub fn failure(status: UpdateStatus, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
        }
    }
}

/// Numeric knobs of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Rolling window `W` in days.
    pub window_days: usize,
    /// Retrain threshold.
    pub min_points: usize,
    /// Future days predicted per retrain.
    pub horizon: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            min_points: DEFAULT_MIN_POINTS,
            horizon: DEFAULT_FORECAST_HORIZON,
        }
    }
}
