//! Sources module - turns raw input into series points.
//!
//! Two modes are supported: manual lists of `{ds, y}` objects pushed over the
//! API, and monthly pulls from a remote [`RecordStore`] aggregated per day.

mod errors;
mod pocketbase_store;
mod source_adapter;
mod sources_model;
mod sources_traits;

pub use errors::AdapterError;
pub use pocketbase_store::PocketBaseRecordStore;
pub use source_adapter::{aggregate_records, SourceAdapter};
pub use sources_model::{NormalizedBatch, RecordQuery};
pub use sources_traits::{Record, RecordStore};
