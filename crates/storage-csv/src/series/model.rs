//! File row model for `{entity}_data.csv`.

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use tidecast_core::series::SeriesPoint;
use tidecast_core::utils::time_utils::{parse_datetime, parse_day, start_of_day_utc};

use crate::errors::StorageError;

const REQUIRED_COLUMNS: [&str; 2] = ["ds", "y"];

/// One row of a series file. Fields stay textual so bad rows can be skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRowDB {
    pub ds: String,
    pub y: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<&SeriesPoint> for SeriesRowDB {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            ds: point.ds.format("%Y-%m-%d").to_string(),
            y: point.y.to_string(),
            created_at: Some(format_timestamp(&point.created_at)),
            updated_at: Some(format_timestamp(&point.updated_at)),
        }
    }
}

impl SeriesRowDB {
    /// `None` when `ds` or `y` is unusable. Missing timestamps fall back to
    /// midnight UTC of `ds`.
    fn into_point(self) -> Option<SeriesPoint> {
        let ds = parse_day(&self.ds)?;
        let y = self.y.trim().parse::<f64>().ok().filter(|y| y.is_finite())?;
        let fallback = start_of_day_utc(ds);
        let stamp = |value: Option<String>| {
            value
                .as_deref()
                .and_then(parse_datetime)
                .unwrap_or(fallback)
        };
        Some(SeriesPoint {
            ds,
            y,
            created_at: stamp(self.created_at),
            updated_at: stamp(self.updated_at),
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a series file. Structural problems fail the whole file; rows with
/// an unusable `ds` or `y` are dropped.
pub fn decode_series(path: &Path, bytes: &[u8]) -> Result<Vec<SeriesPoint>, StorageError> {
    let csv_err = |source: csv::Error| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(StorageError::Header {
                path: path.to_path_buf(),
                message: format!("missing '{}' column", column),
            });
        }
    }

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for row in reader.deserialize::<SeriesRowDB>() {
        match row.map_err(csv_err)?.into_point() {
            Some(point) => points.push(point),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("Dropped {} unparseable rows from {}", dropped, path.display());
    }
    Ok(points)
}

pub fn encode_series(points: &[SeriesPoint]) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // An empty series still gets its header.
    if points.is_empty() {
        writer
            .write_record(["ds", "y", "created_at", "updated_at"])
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
    }
    for point in points {
        writer
            .serialize(SeriesRowDB::from(point))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}
