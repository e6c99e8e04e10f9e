//! CSV file storage implementation for Tidecast.
//!
//! Implements the repository traits defined in `tidecast-core` on top of a
//! flat data directory:
//!
//! ```text
//! data_dir/
//!   {entity}_data.csv       ds,y,created_at,updated_at
//!   {entity}_forecast.csv   ds,yhat,yhat_lower,yhat_upper
//! ```
//!
//! Every write goes to a temporary file in the same directory that is then
//! renamed over the target, so readers see either the old or the new file.
//! Blocking file I/O runs on tokio's blocking pool.

pub mod errors;
pub mod files;
pub mod forecast;
pub mod series;

pub use errors::StorageError;
pub use files::DataDir;
pub use forecast::CsvForecastRepository;
pub use series::CsvSeriesRepository;

// Re-export from tidecast-core for convenience
pub use tidecast_core::errors::{Error, Result};
