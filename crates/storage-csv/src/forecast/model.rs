//! File row model for `{entity}_forecast.csv`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tidecast_core::forecast::{Forecast, ForecastPoint};
use tidecast_core::utils::time_utils::parse_day;

use crate::errors::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRowDB {
    pub ds: String,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl From<&ForecastPoint> for ForecastRowDB {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            ds: point.ds.format("%Y-%m-%d").to_string(),
            yhat: point.yhat,
            yhat_lower: point.yhat_lower,
            yhat_upper: point.yhat_upper,
        }
    }
}

/// Parses a forecast file; any bad row fails the whole file.
pub fn decode_forecast(path: &Path, bytes: &[u8]) -> Result<Forecast, StorageError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut points = Vec::new();
    for row in reader.deserialize::<ForecastRowDB>() {
        let row = row.map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let ds = parse_day(&row.ds).ok_or_else(|| StorageError::Header {
            path: path.to_path_buf(),
            message: format!("invalid date '{}'", row.ds),
        })?;
        points.push(ForecastPoint {
            ds,
            yhat: row.yhat,
            yhat_lower: row.yhat_lower,
            yhat_upper: row.yhat_upper,
        });
    }
    Ok(Forecast::new(points))
}

pub fn encode_forecast(forecast: &Forecast) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if forecast.is_empty() {
        writer
            .write_record(["ds", "yhat", "yhat_lower", "yhat_upper"])
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
    }
    for point in forecast.points() {
        writer
            .serialize(ForecastRowDB::from(point))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}
