use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::EntityName;
use crate::errors::Result;
use crate::forecast::errors::ForecastingError;
use crate::forecast::forecast_model::Forecast;

/// A forecasting model that can be trained on a daily series.
///
/// Implementations are CPU-bound and are always called from the blocking pool.
pub trait Forecaster: Send + Sync {
    fn fit(&self, history: &[(NaiveDate, f64)]) -> std::result::Result<Box<dyn FittedModel>, ForecastingError>;
}

/// A trained model.
pub trait FittedModel: Send {
    /// Predicts the fitted history plus `horizon` future days.
    fn predict(&self, horizon: usize) -> std::result::Result<Forecast, ForecastingError>;
}

/// Trait for forecast persistence.
#[async_trait]
pub trait ForecastRepositoryTrait: Send + Sync {
    async fn load_forecast(&self, entity: &EntityName) -> Result<Option<Forecast>>;
    /// Atomically replaces the stored forecast.
    async fn save_forecast(&self, entity: &EntityName, forecast: &Forecast) -> Result<()>;
    /// Returns whether a forecast was removed.
    async fn delete_forecast(&self, entity: &EntityName) -> Result<bool>;
    async fn forecast_exists(&self, entity: &EntityName) -> Result<bool>;
}
