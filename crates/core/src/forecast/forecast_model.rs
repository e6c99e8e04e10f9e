//! Forecast domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One predicted day with its uncertainty interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Ordered predictions covering the fitted history plus the future horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ForecastPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.ds)
    }
}
