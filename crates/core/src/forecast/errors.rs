use thiserror::Error;

/// Errors raised by a forecasting model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastingError {
    #[error("Model fit failed: {0}")]
    Fit(String),

    #[error("Prediction failed: {0}")]
    Predict(String),

    #[error("Model panicked: {0}")]
    Panicked(String),
}
