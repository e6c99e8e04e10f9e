//! Tests for the update orchestrator using in-memory fakes.

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::entities::{EntityName, EntityRegistry};
use crate::errors::{Error, ValidationError};
use crate::forecast::Forecaster;
use crate::series::SeriesPoint;
use crate::sources::RecordStore;
use crate::test_support::{
    day, forecast_of, FakeForecaster, FakeRecordStore, InMemoryForecastRepository,
    InMemorySeriesRepository,
};
use crate::update::{PipelineSettings, UpdateOrchestrator, UpdateOrchestratorTrait, UpdateStatus};
use crate::utils::time_utils::CalendarMonth;

struct Harness {
    orchestrator: Arc<UpdateOrchestrator>,
    series: Arc<InMemorySeriesRepository>,
    forecasts: Arc<InMemoryForecastRepository>,
    forecaster: Arc<FakeForecaster>,
}

fn harness_with(forecaster: FakeForecaster, record_store: Option<Arc<dyn RecordStore>>) -> Harness {
    let series = Arc::new(InMemorySeriesRepository::default());
    let forecasts = Arc::new(InMemoryForecastRepository::default());
    let forecaster = Arc::new(forecaster);
    let orchestrator = Arc::new(UpdateOrchestrator::new(
        Arc::new(EntityRegistry::builtin()),
        series.clone(),
        forecasts.clone(),
        forecaster.clone() as Arc<dyn Forecaster>,
        record_store,
        PipelineSettings::default(),
    ));
    Harness {
        orchestrator,
        series,
        forecasts,
        forecaster,
    }
}

fn harness() -> Harness {
    harness_with(FakeForecaster::default(), None)
}

fn sales() -> EntityName {
    EntityName::new("sales").unwrap()
}

/// `count` consecutive days starting at `start` offset.
fn rows(start: i64, count: i64) -> Vec<Value> {
    (start..start + count)
        .map(|i| json!({"ds": day(i).to_string(), "y": i as f64}))
        .collect()
}

fn stored_points(count: i64) -> Vec<SeriesPoint> {
    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| SeriesPoint {
            ds: day(i),
            y: i as f64,
            created_at: stamp,
            updated_at: stamp,
        })
        .collect()
}

fn record(value: Value) -> crate::sources::Record {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Manual updates
// ============================================================================

#[tokio::test]
async fn manual_below_threshold_stores_and_drops_forecast() {
    let h = harness();
    h.orchestrator.manual_update("sales", rows(0, 5)).await.unwrap();
    h.forecasts.seed(&sales(), forecast_of(10));

    let outcome = h.orchestrator.manual_update("sales", rows(5, 3)).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, UpdateStatus::InsufficientData);
    assert!(outcome.message.contains("8 points"));
    assert!(outcome.message.contains("Old forecast removed"));
    assert_eq!(h.series.stored(&sales()).unwrap().len(), 8);
    assert!(h.forecasts.stored(&sales()).is_none());
    assert_eq!(h.forecaster.fit_calls(), 0);
}

#[tokio::test]
async fn manual_crossing_threshold_retrains() {
    let h = harness();
    h.orchestrator.manual_update("sales", rows(0, 19)).await.unwrap();
    assert_eq!(h.forecaster.fit_calls(), 0);

    let outcome = h.orchestrator.manual_update("sales", rows(19, 1)).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, UpdateStatus::Retrained);
    assert_eq!(h.forecaster.fit_calls(), 1);
    let forecast = h.orchestrator.get_forecast("sales").await.unwrap();
    assert_eq!(forecast.len(), 20 + 30);
    assert_eq!(forecast.last_day(), Some(day(19 + 30)));
}

#[tokio::test]
async fn duplicate_submission_keeps_latest_value() {
    let h = harness();
    h.orchestrator
        .manual_update("sales", vec![json!({"ds": "2024-03-01", "y": 10})])
        .await
        .unwrap();
    h.orchestrator
        .manual_update("sales", vec![json!({"ds": "2024-03-01", "y": 20})])
        .await
        .unwrap();

    let history = h.orchestrator.get_history("sales").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.points()[0].y, 20.0);
}

#[tokio::test]
async fn manual_with_only_invalid_rows_reports_no_data() {
    let h = harness();
    let outcome = h
        .orchestrator
        .manual_update("sales", vec![json!({"ds": "yesterday", "y": 1})])
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, UpdateStatus::NoData);
    assert!(outcome.message.contains("1 skipped"));
    assert!(h.series.stored(&sales()).is_none());
}

#[tokio::test]
async fn skipped_rows_are_noted_in_message() {
    let h = harness();
    let mut payload = rows(0, 3);
    payload.push(json!({"ds": "2024-02-30", "y": 1}));
    let outcome = h.orchestrator.manual_update("sales", payload).await.unwrap();
    assert_eq!(outcome.status, UpdateStatus::InsufficientData);
    assert!(outcome.message.contains("1 invalid records skipped"));
}

#[tokio::test]
async fn manual_validation_errors_fail_fast() {
    let h = harness();
    assert!(matches!(
        h.orchestrator.manual_update("sales", Vec::new()).await,
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));
    assert!(matches!(
        h.orchestrator
            .manual_update("sales", vec![json!({"value": 1})])
            .await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        h.orchestrator.manual_update("unknown", rows(0, 1)).await,
        Err(Error::UnknownEntity(_))
    ));
    assert!(h.series.stored(&sales()).is_none());
}

#[tokio::test]
async fn retrain_failure_preserves_cached_forecast() {
    let h = harness_with(FakeForecaster::failing("did not converge"), None);
    h.forecasts.seed(&sales(), forecast_of(12));

    let outcome = h.orchestrator.manual_update("sales", rows(0, 25)).await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.status, UpdateStatus::RetrainFailed);
    assert!(outcome.message.contains("did not converge"));
    assert_eq!(h.forecasts.stored(&sales()).unwrap().len(), 12);
    assert_eq!(h.series.stored(&sales()).unwrap().len(), 25);
}

#[tokio::test]
async fn series_write_failure_is_a_failed_outcome() {
    let h = harness();
    h.series.fail_saves(true);
    let outcome = h.orchestrator.manual_update("sales", rows(0, 25)).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.status, UpdateStatus::StorageFailed);
    assert_eq!(h.forecaster.fit_calls(), 0);
}

#[tokio::test]
async fn forecast_write_failure_is_a_failed_outcome() {
    let h = harness();
    h.forecasts.fail_saves(true);
    let outcome = h.orchestrator.manual_update("sales", rows(0, 25)).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.status, UpdateStatus::StorageFailed);
}

#[tokio::test]
async fn unreadable_series_is_noted_and_replaced() {
    let h = harness();
    h.series.fail_loads(true);
    let outcome = h.orchestrator.manual_update("sales", rows(0, 2)).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.message.contains("could not be read"));
}

// ============================================================================
// Monthly pulls
// ============================================================================

#[tokio::test]
async fn monthly_count_aggregation_skips_empty_days() {
    let store = Arc::new(FakeRecordStore::with_records(vec![
        record(json!({"created": "2024-01-10 08:00:00.000Z"})),
        record(json!({"created": "2024-01-10 09:00:00.000Z"})),
        record(json!({"created": "2024-01-10 17:30:00.000Z"})),
    ]));
    let h = harness_with(FakeForecaster::default(), Some(store.clone()));

    let outcome = h
        .orchestrator
        .monthly_update("service_request_counts", 2024, 1)
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, UpdateStatus::InsufficientData);
    assert!(outcome.message.contains("used data for 2024-01"));
    let history = h
        .orchestrator
        .get_history("service_request_counts")
        .await
        .unwrap();
    assert_eq!(history.observations(), vec![(day(9), 3.0)]);

    let query = &store.queries()[0];
    assert_eq!(query.collection, "service_tickets");
    assert_eq!(query.start.date(), day(0));
    assert_eq!(query.end.date(), day(31));
}

#[tokio::test]
async fn monthly_without_record_store_is_not_configured() {
    let h = harness();
    let outcome = h.orchestrator.monthly_update("sales", 2024, 1).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.status, UpdateStatus::NotConfigured);
}

#[tokio::test]
async fn monthly_fetch_failure_reports_zero_points() {
    let store = Arc::new(FakeRecordStore::failing("connection refused"));
    let h = harness_with(FakeForecaster::default(), Some(store));
    h.series.seed(&sales(), stored_points(3));

    let outcome = h.orchestrator.monthly_update("sales", 2024, 1).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, UpdateStatus::NoData);
    assert!(outcome.message.contains("connection refused"));
    assert_eq!(h.series.stored(&sales()).unwrap().len(), 3);
}

#[tokio::test]
async fn monthly_validates_month_and_entity() {
    let h = harness_with(FakeForecaster::default(), Some(Arc::new(FakeRecordStore::default())));
    assert!(matches!(
        h.orchestrator.monthly_update("sales", 2024, 13).await,
        Err(Error::Validation(ValidationError::InvalidMonth(_)))
    ));
    assert!(matches!(
        h.orchestrator.monthly_update("nope", 2024, 1).await,
        Err(Error::UnknownEntity(_))
    ));
}

#[tokio::test]
async fn pull_all_visits_every_sourced_entity() {
    let store = Arc::new(FakeRecordStore::default());
    let h = harness_with(FakeForecaster::default(), Some(store.clone()));

    let results = h
        .orchestrator
        .pull_all(CalendarMonth::new(2024, 5).unwrap())
        .await;

    assert_eq!(results.len(), 4);
    assert!(results
        .iter()
        .all(|(_, outcome)| outcome.status == UpdateStatus::NoData));
    assert_eq!(store.queries().len(), 4);
}

// ============================================================================
// Bootstrap and reads
// ============================================================================

#[tokio::test]
async fn retrain_missing_trains_only_entities_without_forecast() {
    let h = harness();
    let stocks = EntityName::new("product_stocks").unwrap();
    h.series.seed(&sales(), stored_points(30));
    h.series.seed(&stocks, stored_points(30));
    h.forecasts.seed(&stocks, forecast_of(4));

    let results = h.orchestrator.retrain_missing().await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, sales());
    assert_eq!(results[0].1.status, UpdateStatus::Retrained);
    assert_eq!(h.forecasts.stored(&sales()).unwrap().len(), 60);
    assert_eq!(h.forecasts.stored(&stocks).unwrap().len(), 4);
}

#[tokio::test]
async fn reads_map_missing_data_to_not_found() {
    let h = harness();
    assert!(matches!(
        h.orchestrator.get_forecast("sales").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        h.orchestrator.get_history("sales").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        h.orchestrator.get_history("nope").await,
        Err(Error::UnknownEntity(_))
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_of_one_entity_never_overlap() {
    let h = harness_with(FakeForecaster::slow(Duration::from_millis(150)), None);

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.manual_update("sales", rows(0, 20)).await })
    };
    let second = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.manual_update("sales", rows(20, 20)).await })
    };
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(first.status, UpdateStatus::Retrained);
    assert_eq!(second.status, UpdateStatus::Retrained);
    assert_eq!(h.forecaster.max_concurrent_fits(), 1);
    // Whichever ran last saw both batches.
    assert_eq!(h.series.stored(&sales()).unwrap().len(), 40);
    assert_eq!(h.forecasts.stored(&sales()).unwrap().len(), 40 + 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_entities_retrain_in_parallel() {
    let h = harness_with(FakeForecaster::slow(Duration::from_millis(300)), None);

    let (a, b) = tokio::join!(
        h.orchestrator.manual_update("sales", rows(0, 20)),
        h.orchestrator.manual_update("product_stocks", rows(0, 20)),
    );

    assert_eq!(a.unwrap().status, UpdateStatus::Retrained);
    assert_eq!(b.unwrap().status, UpdateStatus::Retrained);
    assert_eq!(h.forecaster.max_concurrent_fits(), 2);
}
