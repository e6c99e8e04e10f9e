//! CSV storage for rolling series.

mod model;
mod repository;

pub use model::{decode_series, encode_series, SeriesRowDB};
pub use repository::CsvSeriesRepository;
