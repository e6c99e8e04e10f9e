use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::entities::{Aggregation, SourceConfig};
use crate::errors::ValidationError;
use crate::series::NewSeriesPoint;
use crate::sources::errors::AdapterError;
use crate::sources::sources_model::{NormalizedBatch, RecordQuery};
use crate::sources::sources_traits::{Record, RecordStore};
use crate::utils::time_utils::{parse_datetime, parse_day, CalendarMonth};

/// Normalizes manual payloads and remote records into [`NewSeriesPoint`]s.
#[derive(Clone, Default)]
pub struct SourceAdapter {
    record_store: Option<Arc<dyn RecordStore>>,
}

impl SourceAdapter {
    pub fn new(record_store: Option<Arc<dyn RecordStore>>) -> Self {
        Self { record_store }
    }

    pub fn has_record_store(&self) -> bool {
        self.record_store.is_some()
    }

    /// Validates and parses a manually pushed list of `{ds, y[, created_at]}` objects.
    ///
    /// The payload as a whole must be non-empty and carry the `ds`/`y` keys;
    /// individual rows that fail to parse are skipped and counted.
    pub fn normalize_manual(&self, records: &[Value]) -> Result<NormalizedBatch, ValidationError> {
        if records.is_empty() {
            return Err(ValidationError::InvalidInput(
                "expecting a non-empty list of data points".to_string(),
            ));
        }
        let has_keys = records.iter().any(|record| {
            record
                .as_object()
                .is_some_and(|o| o.contains_key("ds") && o.contains_key("y"))
        });
        if !has_keys {
            return Err(ValidationError::InvalidInput(
                "new data must contain 'ds' and 'y' fields".to_string(),
            ));
        }

        let mut batch = NormalizedBatch::default();
        for record in records {
            match parse_manual_record(record) {
                Some(point) => batch.points.push(point),
                None => batch.skipped += 1,
            }
        }
        if batch.skipped > 0 {
            debug!("Skipped {} unparseable manual records", batch.skipped);
        }
        Ok(batch)
    }

    /// Query for `[month start, next month start)` on the source's timestamp field.
    pub fn build_query(source: &SourceConfig, month: CalendarMonth) -> RecordQuery {
        RecordQuery {
            collection: source.collection_name.clone(),
            timestamp_field: source.timestamp_field.clone(),
            start: month.first_day().and_time(chrono::NaiveTime::MIN),
            end: month.next_first_day().and_time(chrono::NaiveTime::MIN),
            equals: source
                .filter
                .as_ref()
                .map(|f| (f.field.clone(), f.value.clone())),
        }
    }

    /// Pulls one calendar month of records and aggregates them per day.
    pub async fn fetch_month(
        &self,
        source: &SourceConfig,
        month: CalendarMonth,
    ) -> Result<NormalizedBatch, AdapterError> {
        let store = self
            .record_store
            .as_ref()
            .ok_or(AdapterError::NotConfigured)?;
        let query = Self::build_query(source, month);
        let records = store.query(&query).await?;
        debug!(
            "Fetched {} records from '{}' for {}",
            records.len(),
            source.collection_name,
            month
        );

        let batch = aggregate_records(source, &records);
        if batch.skipped > 0 {
            warn!(
                "Skipped {} records from '{}' with missing or invalid fields",
                batch.skipped, source.collection_name
            );
        }
        Ok(batch)
    }
}

/// Maps raw records to daily points according to the source's aggregation.
///
/// Days without records produce no point. Output is ascending by day.
pub fn aggregate_records(source: &SourceConfig, records: &[Record]) -> NormalizedBatch {
    let mut skipped = 0;
    let value_field = source.value_field.as_deref().unwrap_or_default();

    let mut rows: Vec<(NaiveDate, f64)> = Vec::with_capacity(records.len());
    for record in records {
        let Some(ds) = record
            .get(&source.timestamp_field)
            .and_then(Value::as_str)
            .and_then(parse_day)
        else {
            skipped += 1;
            continue;
        };

        let y = match source.aggregation {
            Aggregation::Count => Some(1.0),
            Aggregation::None | Aggregation::Sum => record.get(value_field).and_then(number_value),
        };
        match y {
            Some(y) => rows.push((ds, y)),
            None => skipped += 1,
        }
    }

    let points = match source.aggregation {
        Aggregation::None => {
            rows.sort_by_key(|(ds, _)| *ds);
            rows.into_iter()
                .map(|(ds, y)| NewSeriesPoint::new(ds, y))
                .collect()
        }
        Aggregation::Count | Aggregation::Sum => {
            let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for (ds, y) in rows {
                *by_day.entry(ds).or_insert(0.0) += y;
            }
            by_day
                .into_iter()
                .map(|(ds, y)| NewSeriesPoint::new(ds, y))
                .collect()
        }
    };

    NormalizedBatch { points, skipped }
}

fn parse_manual_record(record: &Value) -> Option<NewSeriesPoint> {
    let object = record.as_object()?;
    let ds = object.get("ds")?.as_str().and_then(parse_day)?;
    let y = object.get("y").and_then(number_value)?;
    let created_at = object
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(parse_datetime);
    Some(NewSeriesPoint { ds, y, created_at })
}

/// Finite number from a JSON number or numeric string.
fn number_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
