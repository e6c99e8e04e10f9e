//! Series module - rolling per-entity daily series.
//!
//! - [`series_model`] - points, the consolidated [`Series`] and the pure merge
//! - [`series_traits`] - persistence trait implemented by the storage crate
//! - [`series_store`] - load, merge, truncate and persist under an entity lock

mod series_model;
mod series_store;
mod series_traits;

pub use series_model::{merge_points, Consolidation, NewSeriesPoint, Series, SeriesPoint};
pub use series_store::SeriesStore;
pub use series_traits::SeriesRepositoryTrait;
