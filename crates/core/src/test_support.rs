//! In-memory fakes shared by the unit tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::entities::EntityName;
use crate::errors::{Result, StorageError};
use crate::forecast::{
    FittedModel, Forecast, ForecastPoint, ForecastRepositoryTrait, Forecaster, ForecastingError,
};
use crate::series::{NewSeriesPoint, SeriesPoint, SeriesRepositoryTrait};
use crate::sources::{AdapterError, Record, RecordQuery, RecordStore};

/// `2024-01-01 + offset` days.
pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

pub fn point(offset: i64, y: f64) -> NewSeriesPoint {
    NewSeriesPoint::new(day(offset), y)
}

pub fn forecast_of(len: i64) -> Forecast {
    Forecast::new(
        (0..len)
            .map(|i| ForecastPoint {
                ds: day(i),
                yhat: 1.0,
                yhat_lower: 0.0,
                yhat_upper: 2.0,
            })
            .collect(),
    )
}

// ============================================================================
// Series repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySeriesRepository {
    series: Arc<Mutex<HashMap<EntityName, Vec<SeriesPoint>>>>,
    fail_loads: Arc<Mutex<bool>>,
    fail_saves: Arc<Mutex<bool>>,
}

impl InMemorySeriesRepository {
    pub fn stored(&self, entity: &EntityName) -> Option<Vec<SeriesPoint>> {
        self.series.lock().unwrap().get(entity).cloned()
    }

    pub fn seed(&self, entity: &EntityName, points: Vec<SeriesPoint>) {
        self.series.lock().unwrap().insert(entity.clone(), points);
    }

    pub fn fail_loads(&self, fail: bool) {
        *self.fail_loads.lock().unwrap() = fail;
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }
}

#[async_trait]
impl SeriesRepositoryTrait for InMemorySeriesRepository {
    async fn load_series(&self, entity: &EntityName) -> Result<Option<Vec<SeriesPoint>>> {
        if *self.fail_loads.lock().unwrap() {
            return Err(StorageError::Corrupt("missing 'ds' column".to_string()).into());
        }
        Ok(self.stored(entity))
    }

    async fn save_series(&self, entity: &EntityName, points: &[SeriesPoint]) -> Result<()> {
        if *self.fail_saves.lock().unwrap() {
            return Err(StorageError::WriteFailed("disk full".to_string()).into());
        }
        self.seed(entity, points.to_vec());
        Ok(())
    }
}

// ============================================================================
// Forecast repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryForecastRepository {
    forecasts: Arc<Mutex<HashMap<EntityName, Forecast>>>,
    fail_saves: Arc<Mutex<bool>>,
}

impl InMemoryForecastRepository {
    pub fn stored(&self, entity: &EntityName) -> Option<Forecast> {
        self.forecasts.lock().unwrap().get(entity).cloned()
    }

    pub fn seed(&self, entity: &EntityName, forecast: Forecast) {
        self.forecasts
            .lock()
            .unwrap()
            .insert(entity.clone(), forecast);
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }
}

#[async_trait]
impl ForecastRepositoryTrait for InMemoryForecastRepository {
    async fn load_forecast(&self, entity: &EntityName) -> Result<Option<Forecast>> {
        Ok(self.stored(entity))
    }

    async fn save_forecast(&self, entity: &EntityName, forecast: &Forecast) -> Result<()> {
        if *self.fail_saves.lock().unwrap() {
            return Err(StorageError::WriteFailed("read-only".to_string()).into());
        }
        self.seed(entity, forecast.clone());
        Ok(())
    }

    async fn delete_forecast(&self, entity: &EntityName) -> Result<bool> {
        Ok(self.forecasts.lock().unwrap().remove(entity).is_some())
    }

    async fn forecast_exists(&self, entity: &EntityName) -> Result<bool> {
        Ok(self.forecasts.lock().unwrap().contains_key(entity))
    }
}

// ============================================================================
// Forecaster
// ============================================================================

#[derive(Clone, Default)]
enum FakeBehavior {
    #[default]
    Succeed,
    Fail(String),
    Panic,
}

/// Forecaster that predicts a flat mean and records how it was called.
#[derive(Default)]
pub struct FakeForecaster {
    behavior: FakeBehavior,
    delay: Option<std::time::Duration>,
    fit_calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeForecaster {
    pub fn failing(message: &str) -> Self {
        Self {
            behavior: FakeBehavior::Fail(message.to_string()),
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            behavior: FakeBehavior::Panic,
            ..Self::default()
        }
    }

    /// Succeeds after sleeping inside `fit`.
    pub fn slow(delay: std::time::Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fit_calls(&self) -> usize {
        self.fit_calls.load(Ordering::SeqCst)
    }

    /// Highest number of fits observed running at the same time.
    pub fn max_concurrent_fits(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

struct FakeFitted {
    history: Vec<(NaiveDate, f64)>,
}

impl Forecaster for FakeForecaster {
    fn fit(
        &self,
        history: &[(NaiveDate, f64)],
    ) -> std::result::Result<Box<dyn FittedModel>, ForecastingError> {
        self.fit_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            FakeBehavior::Succeed => Ok(Box::new(FakeFitted {
                history: history.to_vec(),
            })),
            FakeBehavior::Fail(message) => Err(ForecastingError::Fit(message.clone())),
            FakeBehavior::Panic => panic!("model blew up"),
        }
    }
}

impl FittedModel for FakeFitted {
    fn predict(&self, horizon: usize) -> std::result::Result<Forecast, ForecastingError> {
        let mean = self.history.iter().map(|(_, y)| y).sum::<f64>() / self.history.len() as f64;
        let last = self
            .history
            .last()
            .map(|(ds, _)| *ds)
            .ok_or_else(|| ForecastingError::Predict("empty history".to_string()))?;
        let future = (1..=horizon as i64).map(|i| last + Duration::days(i));
        let points = self
            .history
            .iter()
            .map(|(ds, _)| *ds)
            .chain(future)
            .map(|ds| ForecastPoint {
                ds,
                yhat: mean,
                yhat_lower: mean - 1.0,
                yhat_upper: mean + 1.0,
            })
            .collect();
        Ok(Forecast::new(points))
    }
}

// ============================================================================
// Record store
// ============================================================================

#[derive(Default)]
pub struct FakeRecordStore {
    records: Vec<Record>,
    error: Option<AdapterError>,
    queries: Arc<Mutex<Vec<RecordQuery>>>,
}

impl FakeRecordStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(AdapterError::Fetch {
                collection: "any".to_string(),
                message: message.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<RecordQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn query(&self, query: &RecordQuery) -> std::result::Result<Vec<Record>, AdapterError> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.records.clone()),
        }
    }
}
