use log::{info, warn};
use std::any::Any;
use std::sync::Arc;

use crate::errors::Result;
use crate::forecast::errors::ForecastingError;
use crate::forecast::forecast_cache::ForecastCache;
use crate::forecast::forecast_model::Forecast;
use crate::forecast::forecast_traits::Forecaster;
use crate::locks::EntityGuard;
use crate::series::Series;

/// What the gate did with a consolidated series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Below the threshold; any previous forecast was dropped.
    Insufficient { points: usize, removed_forecast: bool },
    /// Model retrained and the new forecast stored.
    Retrained { points: usize, forecast_len: usize },
    /// Fit or predict failed; the cached forecast is untouched.
    Failed { message: String },
}

/// Decides whether a series is large enough to retrain on, and retrains it.
pub struct RetrainGate {
    forecaster: Arc<dyn Forecaster>,
    cache: Arc<ForecastCache>,
    min_points: usize,
    horizon: usize,
}

impl RetrainGate {
    pub fn new(
        forecaster: Arc<dyn Forecaster>,
        cache: Arc<ForecastCache>,
        min_points: usize,
        horizon: usize,
    ) -> Self {
        Self {
            forecaster,
            cache,
            min_points,
            horizon,
        }
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Only a failed forecast write is returned as an error.
    pub async fn run(&self, guard: &EntityGuard, series: &Series) -> Result<GateOutcome> {
        let entity = guard.entity();
        let points = series.len();

        if points < self.min_points {
            let removed_forecast = match self.cache.delete(guard).await {
                Ok(removed) => removed,
                Err(e) => {
                    warn!("Could not remove old forecast for '{}': {}", entity, e);
                    false
                }
            };
            info!(
                "Not enough data for '{}' ({} of {} points), skipping retrain",
                entity, points, self.min_points
            );
            return Ok(GateOutcome::Insufficient {
                points,
                removed_forecast,
            });
        }

        match self.fit_and_predict(series).await {
            Ok(forecast) => {
                self.cache.put(guard, &forecast).await?;
                info!(
                    "Retrained '{}' on {} points ({} forecast rows)",
                    entity,
                    points,
                    forecast.len()
                );
                Ok(GateOutcome::Retrained {
                    points,
                    forecast_len: forecast.len(),
                })
            }
            Err(e) => {
                warn!("Retraining '{}' failed: {}", entity, e);
                Ok(GateOutcome::Failed {
                    message: e.to_string(),
                })
            }
        }
    }

    async fn fit_and_predict(&self, series: &Series) -> std::result::Result<Forecast, ForecastingError> {
        let forecaster = Arc::clone(&self.forecaster);
        let history = series.observations();
        let horizon = self.horizon;

        tokio::task::spawn_blocking(move || {
            let model = forecaster.fit(&history)?;
            model.predict(horizon)
        })
        .await
        .map_err(|e| {
            if e.is_panic() {
                ForecastingError::Panicked(panic_message(e.into_panic()))
            } else {
                ForecastingError::Fit(e.to_string())
            }
        })?
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
