use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;

use crate::entities::EntityName;
use crate::errors::{Error, Result};
use crate::locks::EntityGuard;
use crate::series::series_model::{merge_points, Consolidation, NewSeriesPoint, Series};
use crate::series::series_traits::SeriesRepositoryTrait;

/// Owns the rolling series of every entity.
pub struct SeriesStore {
    repository: Arc<dyn SeriesRepositoryTrait>,
    window: usize,
}

impl SeriesStore {
    pub fn new(repository: Arc<dyn SeriesRepositoryTrait>, window: usize) -> Self {
        Self {
            repository,
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Merges `incoming` into the stored series of the guarded entity and persists it.
    pub async fn consolidate(
        &self,
        guard: &EntityGuard,
        incoming: Vec<NewSeriesPoint>,
    ) -> Result<Consolidation> {
        self.consolidate_at(guard, incoming, Utc::now()).await
    }

    pub async fn consolidate_at(
        &self,
        guard: &EntityGuard,
        incoming: Vec<NewSeriesPoint>,
        now: DateTime<Utc>,
    ) -> Result<Consolidation> {
        let entity = guard.entity();
        let mut warnings = Vec::new();

        let received = incoming.len();
        let incoming: Vec<NewSeriesPoint> =
            incoming.into_iter().filter(|p| p.y.is_finite()).collect();
        let discarded = received - incoming.len();
        if discarded > 0 {
            warn!(
                "Discarded {} non-finite incoming values for '{}'",
                discarded, entity
            );
        }

        let existing = match self.repository.load_series(entity).await {
            Ok(points) => points.unwrap_or_default(),
            Err(e) => {
                warn!(
                    "Could not read existing series for '{}': {}. Proceeding as if empty.",
                    entity, e
                );
                warnings.push(format!(
                    "existing data for '{}' could not be read ({}) and was replaced",
                    entity, e
                ));
                Vec::new()
            }
        };

        let series = merge_points(existing, incoming, now, self.window);
        self.repository
            .save_series(entity, series.points())
            .await?;

        debug!(
            "Consolidated {} incoming points into '{}' ({} stored)",
            received - discarded,
            entity,
            series.len()
        );

        Ok(Consolidation {
            series,
            discarded,
            warnings,
        })
    }

    /// Stored series for the read API; `NotFound` when nothing is stored.
    pub async fn history(&self, entity: &EntityName) -> Result<Series> {
        match self.repository.load_series(entity).await? {
            Some(points) if !points.is_empty() => Ok(Series::from_stored(points, self.window)),
            _ => Err(Error::NotFound(format!(
                "no historical data for '{}'",
                entity
            ))),
        }
    }

    /// Stored series of the guarded entity, empty when nothing is stored.
    pub async fn current(&self, guard: &EntityGuard) -> Result<Series> {
        let points = self
            .repository
            .load_series(guard.entity())
            .await?
            .unwrap_or_default();
        Ok(Series::from_stored(points, self.window))
    }

    /// Whether a series file exists for the entity, regardless of its content.
    pub async fn has_series(&self, entity: &EntityName) -> bool {
        matches!(self.repository.load_series(entity).await, Ok(Some(_)))
    }
}
