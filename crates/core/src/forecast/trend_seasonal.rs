//! Bridge to the `tidecast-model` crate.

use chrono::NaiveDate;
use tidecast_model::{FittedTrendSeasonal, ModelError, Observation, TrendSeasonalModel};

use crate::forecast::errors::ForecastingError;
use crate::forecast::forecast_model::{Forecast, ForecastPoint};
use crate::forecast::forecast_traits::{FittedModel, Forecaster};

/// Default forecaster: linear trend plus day-of-week offsets.
#[derive(Debug, Clone, Default)]
pub struct TrendSeasonalForecaster {
    model: TrendSeasonalModel,
}

impl TrendSeasonalForecaster {
    pub fn new(model: TrendSeasonalModel) -> Self {
        Self { model }
    }
}

impl From<ModelError> for ForecastingError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DateOutOfRange => ForecastingError::Predict(err.to_string()),
            _ => ForecastingError::Fit(err.to_string()),
        }
    }
}

impl Forecaster for TrendSeasonalForecaster {
    fn fit(&self, history: &[(NaiveDate, f64)]) -> Result<Box<dyn FittedModel>, ForecastingError> {
        let observations: Vec<Observation> = history
            .iter()
            .map(|(ds, y)| Observation::new(*ds, *y))
            .collect();
        let fitted = self.model.fit(&observations)?;
        Ok(Box::new(fitted))
    }
}

impl FittedModel for FittedTrendSeasonal {
    fn predict(&self, horizon: usize) -> Result<Forecast, ForecastingError> {
        let predictions = FittedTrendSeasonal::predict(self, horizon)?;
        Ok(Forecast::new(
            predictions
                .into_iter()
                .map(|p| ForecastPoint {
                    ds: p.ds,
                    yhat: p.yhat,
                    yhat_lower: p.yhat_lower,
                    yhat_upper: p.yhat_upper,
                })
                .collect(),
        ))
    }
}
