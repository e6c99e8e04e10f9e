//! CSV storage for forecasts.

mod model;
mod repository;

pub use model::{decode_forecast, encode_forecast, ForecastRowDB};
pub use repository::CsvForecastRepository;
