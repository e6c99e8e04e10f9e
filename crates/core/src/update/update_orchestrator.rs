use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::entities::{EntityName, EntityRegistry};
use crate::errors::Result;
use crate::forecast::{
    Forecast, ForecastCache, ForecastRepositoryTrait, Forecaster, GateOutcome, RetrainGate,
};
use crate::locks::{EntityGuard, EntityLocks};
use crate::series::{Series, SeriesRepositoryTrait, SeriesStore};
use crate::sources::{AdapterError, NormalizedBatch, RecordStore, SourceAdapter};
use crate::update::update_model::{PipelineSettings, UpdateOutcome, UpdateStatus};
use crate::update::update_traits::UpdateOrchestratorTrait;
use crate::utils::time_utils::CalendarMonth;

/// Composes the source adapter, series store, retrain gate and forecast cache.
pub struct UpdateOrchestrator {
    registry: Arc<EntityRegistry>,
    locks: EntityLocks,
    adapter: SourceAdapter,
    series: SeriesStore,
    cache: Arc<ForecastCache>,
    gate: RetrainGate,
}

impl UpdateOrchestrator {
    pub fn new(
        registry: Arc<EntityRegistry>,
        series_repository: Arc<dyn SeriesRepositoryTrait>,
        forecast_repository: Arc<dyn ForecastRepositoryTrait>,
        forecaster: Arc<dyn Forecaster>,
        record_store: Option<Arc<dyn RecordStore>>,
        settings: PipelineSettings,
    ) -> Self {
        let cache = Arc::new(ForecastCache::new(forecast_repository));
        let gate = RetrainGate::new(
            forecaster,
            cache.clone(),
            settings.min_points,
            settings.horizon,
        );
        Self {
            registry,
            locks: EntityLocks::new(),
            adapter: SourceAdapter::new(record_store),
            series: SeriesStore::new(series_repository, settings.window_days),
            cache,
            gate,
        }
    }

    /// Consolidates a non-empty batch and runs the gate, under the entity lock.
    async fn run_pipeline(&self, guard: &EntityGuard, batch: NormalizedBatch) -> UpdateOutcome {
        let entity = guard.entity();
        let mut notes = Vec::new();
        if batch.skipped > 0 {
            notes.push(format!("{} invalid records skipped", batch.skipped));
        }

        let consolidation = match self.series.consolidate(guard, batch.points).await {
            Ok(consolidation) => consolidation,
            Err(e) => {
                error!("Failed to store series for '{}': {}", entity, e);
                return UpdateOutcome::failure(
                    UpdateStatus::StorageFailed,
                    format!("Failed to save data for '{}': {}", entity, e),
                );
            }
        };
        if consolidation.discarded > 0 {
            notes.push(format!(
                "{} non-finite values discarded",
                consolidation.discarded
            ));
        }
        notes.extend(consolidation.warnings);

        let outcome = match self.gate.run(guard, &consolidation.series).await {
            Ok(gate) => outcome_for_gate(entity, gate),
            Err(e) => {
                error!("Failed to store forecast for '{}': {}", entity, e);
                UpdateOutcome::failure(
                    UpdateStatus::StorageFailed,
                    format!("Failed to save forecast for '{}': {}", entity, e),
                )
            }
        };
        with_notes(outcome, &notes)
    }

    async fn retrain_stored(&self, entity: &EntityName) -> Option<UpdateOutcome> {
        let guard = self.locks.acquire(entity).await;
        // Re-check under the lock; a concurrent update may have trained it.
        if self.cache.exists(entity).await.unwrap_or(false) {
            return None;
        }
        let series = match self.series.current(&guard).await {
            Ok(series) => series,
            Err(e) => {
                warn!("Skipping bootstrap retrain of '{}': {}", entity, e);
                return None;
            }
        };
        if series.is_empty() {
            return None;
        }
        let outcome = match self.gate.run(&guard, &series).await {
            Ok(gate) => outcome_for_gate(entity, gate),
            Err(e) => UpdateOutcome::failure(
                UpdateStatus::StorageFailed,
                format!("Failed to save forecast for '{}': {}", entity, e),
            ),
        };
        Some(outcome)
    }
}

fn outcome_for_gate(entity: &EntityName, gate: GateOutcome) -> UpdateOutcome {
    match gate {
        GateOutcome::Insufficient {
            points,
            removed_forecast,
        } => {
            let mut message = format!(
                "Not enough data ({} points) to train model '{}'. Data saved.",
                points, entity
            );
            if removed_forecast {
                message.push_str(" Old forecast removed.");
            }
            UpdateOutcome::success(UpdateStatus::InsufficientData, message)
        }
        GateOutcome::Retrained {
            points,
            forecast_len,
        } => UpdateOutcome::success(
            UpdateStatus::Retrained,
            format!(
                "Forecast for model '{}' (re)trained on {} points and saved successfully ({} rows).",
                entity, points, forecast_len
            ),
        ),
        GateOutcome::Failed { message } => UpdateOutcome::failure(
            UpdateStatus::RetrainFailed,
            format!(
                "Error during model training or prediction for '{}': {}",
                entity, message
            ),
        ),
    }
}

fn with_notes(mut outcome: UpdateOutcome, notes: &[String]) -> UpdateOutcome {
    if !notes.is_empty() {
        outcome.message = format!("{} ({})", outcome.message, notes.join("; "));
    }
    outcome
}

#[async_trait]
impl UpdateOrchestratorTrait for UpdateOrchestrator {
    fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    async fn manual_update(&self, entity: &str, records: Vec<Value>) -> Result<UpdateOutcome> {
        let config = self.registry.resolve(entity)?;
        let batch = self.adapter.normalize_manual(&records)?;

        if batch.is_empty() {
            info!(
                "Manual update of '{}' had no valid points ({} skipped)",
                config.name, batch.skipped
            );
            return Ok(UpdateOutcome::success(
                UpdateStatus::NoData,
                format!(
                    "No valid new data points provided after parsing ({} skipped). No update performed.",
                    batch.skipped
                ),
            ));
        }

        let guard = self.locks.acquire(&config.name).await;
        debug!(
            "Manual update of '{}' with {} points",
            config.name,
            batch.points.len()
        );
        Ok(self.run_pipeline(&guard, batch).await)
    }

    async fn monthly_update(&self, entity: &str, year: i32, month: u32) -> Result<UpdateOutcome> {
        let (name, source) = self.registry.resolve_source(entity)?;
        let month = CalendarMonth::new(year, month)?;

        let batch = match self.adapter.fetch_month(source, month).await {
            Ok(batch) => batch,
            Err(AdapterError::NotConfigured) => {
                return Ok(UpdateOutcome::failure(
                    UpdateStatus::NotConfigured,
                    "Remote record store not configured.",
                ));
            }
            Err(e) => {
                warn!("Pull of '{}' for {} failed: {}", name, month, e);
                return Ok(UpdateOutcome::success(
                    UpdateStatus::NoData,
                    format!(
                        "No new data fetched for '{}' for {} ({}). Forecast not updated.",
                        name, month, e
                    ),
                ));
            }
        };

        if batch.is_empty() {
            return Ok(UpdateOutcome::success(
                UpdateStatus::NoData,
                format!(
                    "No new data fetched for '{}' for {}. Forecast not updated.",
                    name, month
                ),
            ));
        }

        let guard = self.locks.acquire(name).await;
        let mut outcome = self.run_pipeline(&guard, batch).await;
        outcome.message = format!("{} (used data for {})", outcome.message, month);
        Ok(outcome)
    }

    async fn pull_all(&self, month: CalendarMonth) -> Vec<(EntityName, UpdateOutcome)> {
        let mut results = Vec::new();
        for config in self.registry.iter().filter(|c| c.source.is_some()) {
            match self
                .monthly_update(config.name.as_str(), month.year(), month.month())
                .await
            {
                Ok(outcome) => {
                    info!(
                        "Monthly pull of '{}' for {}: {:?} - {}",
                        config.name, month, outcome.status, outcome.message
                    );
                    results.push((config.name.clone(), outcome));
                }
                Err(e) => error!("Monthly pull of '{}' for {} failed: {}", config.name, month, e),
            }
        }
        results
    }

    async fn retrain_missing(&self) -> Vec<(EntityName, UpdateOutcome)> {
        let mut results = Vec::new();
        for config in self.registry.iter() {
            let name = &config.name;
            if !self.series.has_series(name).await {
                continue;
            }
            match self.cache.exists(name).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    warn!("Could not check forecast of '{}': {}", name, e);
                    continue;
                }
            }
            if let Some(outcome) = self.retrain_stored(name).await {
                info!("Bootstrap of '{}': {}", name, outcome.message);
                results.push((name.clone(), outcome));
            }
        }
        results
    }

    async fn get_forecast(&self, entity: &str) -> Result<Forecast> {
        let config = self.registry.resolve(entity)?;
        self.cache.get(&config.name).await
    }

    async fn get_history(&self, entity: &str) -> Result<Series> {
        let config = self.registry.resolve(entity)?;
        self.series.history(&config.name).await
    }
}
