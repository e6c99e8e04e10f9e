//! Error types for the forecasting model.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while fitting or predicting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Not enough observations to estimate the trend.
    #[error("Insufficient data: {required} observations required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// An observation value is NaN or infinite.
    #[error("Non-finite value at position {index}")]
    NonFiniteValue { index: usize },

    /// Observations must be strictly ascending by date.
    #[error("Observations are not strictly ascending at {ds}")]
    UnorderedInput { ds: NaiveDate },

    /// The prediction horizon runs past the representable date range.
    #[error("Prediction date out of range")]
    DateOutOfRange,
}
