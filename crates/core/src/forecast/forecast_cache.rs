use log::debug;
use std::sync::Arc;

use crate::entities::EntityName;
use crate::errors::{Error, Result};
use crate::forecast::forecast_model::Forecast;
use crate::forecast::forecast_traits::ForecastRepositoryTrait;
use crate::locks::EntityGuard;

/// Latest forecast of every entity.
pub struct ForecastCache {
    repository: Arc<dyn ForecastRepositoryTrait>,
}

impl ForecastCache {
    pub fn new(repository: Arc<dyn ForecastRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub async fn put(&self, guard: &EntityGuard, forecast: &Forecast) -> Result<()> {
        self.repository
            .save_forecast(guard.entity(), forecast)
            .await?;
        debug!(
            "Stored forecast for '{}' ({} points)",
            guard.entity(),
            forecast.len()
        );
        Ok(())
    }

    pub async fn get(&self, entity: &EntityName) -> Result<Forecast> {
        self.repository
            .load_forecast(entity)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no forecast for '{}'", entity)))
    }

    pub async fn delete(&self, guard: &EntityGuard) -> Result<bool> {
        self.repository.delete_forecast(guard.entity()).await
    }

    pub async fn exists(&self, entity: &EntityName) -> Result<bool> {
        self.repository.forecast_exists(entity).await
    }
}
