//! Tidecast Core - domain entities, services, and traits.
//!
//! This crate contains the ingestion and consolidation pipeline:
//!
//! ```text
//! UpdateOrchestrator
//!       │
//!       ├─► SourceAdapter   (manual lists, remote RecordStore pulls)
//!       ├─► SeriesStore     (dedup, order, rolling window, persist)
//!       ├─► RetrainGate     (MinPoints check, Forecaster fit/predict)
//!       └─► ForecastCache   (latest forecast per entity)
//! ```
//!
//! It is storage-agnostic: persistence goes through the repository traits
//! implemented by the `storage-csv` crate, and both the forecasting model and
//! the remote record store are injected capabilities.

pub mod constants;
pub mod entities;
pub mod errors;
pub mod forecast;
pub mod locks;
pub mod series;
pub mod sources;
pub mod update;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
