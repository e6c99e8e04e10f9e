use async_trait::async_trait;
use std::sync::Arc;

use tidecast_core::entities::EntityName;
use tidecast_core::series::{SeriesPoint, SeriesRepositoryTrait};
use tidecast_core::Result;

use super::model::{decode_series, encode_series};
use crate::errors::IntoCore;
use crate::files::{read_optional, write_atomic, DataDir};

/// Stores each entity's series in `{entity}_data.csv`.
pub struct CsvSeriesRepository {
    dir: Arc<DataDir>,
}

impl CsvSeriesRepository {
    pub fn new(dir: Arc<DataDir>) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl SeriesRepositoryTrait for CsvSeriesRepository {
    async fn load_series(&self, entity: &EntityName) -> Result<Option<Vec<SeriesPoint>>> {
        let path = self.dir.series_path(entity);
        tokio::task::spawn_blocking(move || {
            read_optional(&path)?
                .map(|bytes| decode_series(&path, &bytes))
                .transpose()
        })
        .await
        .map_err(crate::StorageError::from)
        .into_core()?
        .into_core()
    }

    async fn save_series(&self, entity: &EntityName, points: &[SeriesPoint]) -> Result<()> {
        let path = self.dir.series_path(entity);
        let bytes = encode_series(points).into_core()?;
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(crate::StorageError::from)
            .into_core()?
            .into_core()
    }
}
