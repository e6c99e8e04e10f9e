//! Forecast module - retraining and the latest forecast per entity.
//!
//! ```text
//! RetrainGate ──► Forecaster (fit on the blocking pool) ──► FittedModel::predict
//!      │
//!      └──► ForecastCache ──► ForecastRepositoryTrait (storage crate)
//! ```

mod errors;
mod forecast_cache;
mod forecast_model;
mod forecast_traits;
mod retrain_gate;
mod trend_seasonal;

pub use errors::ForecastingError;
pub use forecast_cache::ForecastCache;
pub use forecast_model::{Forecast, ForecastPoint};
pub use forecast_traits::{FittedModel, ForecastRepositoryTrait, Forecaster};
pub use retrain_gate::{GateOutcome, RetrainGate};
pub use trend_seasonal::TrendSeasonalForecaster;
