use crate::entities::EntityName;
use crate::errors::Result;
use crate::series::series_model::SeriesPoint;
use async_trait::async_trait;

/// Trait for series persistence.
#[async_trait]
pub trait SeriesRepositoryTrait: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored for the entity.
    ///
    /// Rows that cannot be interpreted are dropped by the implementation;
    /// an unreadable store as a whole is an error.
    async fn load_series(&self, entity: &EntityName) -> Result<Option<Vec<SeriesPoint>>>;

    /// Atomically replaces the stored series.
    async fn save_series(&self, entity: &EntityName, points: &[SeriesPoint]) -> Result<()>;
}
