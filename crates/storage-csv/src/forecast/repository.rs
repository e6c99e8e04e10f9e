use async_trait::async_trait;
use std::sync::Arc;

use tidecast_core::entities::EntityName;
use tidecast_core::forecast::{Forecast, ForecastRepositoryTrait};
use tidecast_core::Result;

use super::model::{decode_forecast, encode_forecast};
use crate::errors::{IntoCore, StorageError};
use crate::files::{read_optional, remove_if_exists, write_atomic, DataDir};

/// Stores each entity's latest forecast in `{entity}_forecast.csv`.
pub struct CsvForecastRepository {
    dir: Arc<DataDir>,
}

impl CsvForecastRepository {
    pub fn new(dir: Arc<DataDir>) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ForecastRepositoryTrait for CsvForecastRepository {
    async fn load_forecast(&self, entity: &EntityName) -> Result<Option<Forecast>> {
        let path = self.dir.forecast_path(entity);
        tokio::task::spawn_blocking(move || {
            read_optional(&path)?
                .map(|bytes| decode_forecast(&path, &bytes))
                .transpose()
        })
        .await
        .map_err(StorageError::from)
        .into_core()?
        .into_core()
    }

    async fn save_forecast(&self, entity: &EntityName, forecast: &Forecast) -> Result<()> {
        let path = self.dir.forecast_path(entity);
        let bytes = encode_forecast(forecast).into_core()?;
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(StorageError::from)
            .into_core()?
            .into_core()
    }

    async fn delete_forecast(&self, entity: &EntityName) -> Result<bool> {
        let path = self.dir.forecast_path(entity);
        tokio::task::spawn_blocking(move || remove_if_exists(&path))
            .await
            .map_err(StorageError::from)
            .into_core()?
            .into_core()
    }

    async fn forecast_exists(&self, entity: &EntityName) -> Result<bool> {
        let path = self.dir.forecast_path(entity);
        tokio::task::spawn_blocking(move || {
            path.try_exists()
                .map_err(|source| StorageError::Read { path, source })
        })
        .await
        .map_err(StorageError::from)
        .into_core()?
        .into_core()
    }
}
