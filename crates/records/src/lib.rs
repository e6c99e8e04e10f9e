//! Tidecast remote record store crate.
//!
//! Provides a small PocketBase REST client used to pull raw records for the
//! monthly update flow. Records are returned as untyped JSON objects; mapping
//! them onto series points is the caller's job.
//!
//! ```text
//! tidecast-core (RecordStore trait)
//!         │
//!         ▼
//! PocketBaseClient ──► GET /api/collections/{collection}/records?filter=...
//! ```

pub mod errors;
pub mod filter;
pub mod pocketbase;

pub use errors::RecordStoreError;
pub use filter::FilterBuilder;
pub use pocketbase::{PocketBaseClient, Record};
