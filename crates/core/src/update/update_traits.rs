use async_trait::async_trait;
use serde_json::Value;

use crate::entities::{EntityName, EntityRegistry};
use crate::errors::Result;
use crate::forecast::Forecast;
use crate::series::Series;
use crate::update::update_model::UpdateOutcome;
use crate::utils::time_utils::CalendarMonth;

/// Trait for the update orchestration service.
///
/// Unknown entities and malformed payloads fail fast with an error before
/// any I/O; everything past validation ends in an [`UpdateOutcome`].
#[async_trait]
pub trait UpdateOrchestratorTrait: Send + Sync {
    fn registry(&self) -> &EntityRegistry;

    /// Merges a manually pushed list of `{ds, y}` objects and retrains.
    async fn manual_update(&self, entity: &str, records: Vec<Value>) -> Result<UpdateOutcome>;

    /// Pulls one calendar month from the record store and retrains.
    async fn monthly_update(&self, entity: &str, year: i32, month: u32) -> Result<UpdateOutcome>;

    /// Runs [`monthly_update`](Self::monthly_update) for every entity with a source.
    async fn pull_all(&self, month: CalendarMonth) -> Vec<(EntityName, UpdateOutcome)>;

    /// Trains every entity that has a stored series but no forecast.
    async fn retrain_missing(&self) -> Vec<(EntityName, UpdateOutcome)>;

    async fn get_forecast(&self, entity: &str) -> Result<Forecast>;

    async fn get_history(&self, entity: &str) -> Result<Series>;
}
