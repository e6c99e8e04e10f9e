use async_trait::async_trait;

use crate::sources::errors::AdapterError;
use crate::sources::sources_model::RecordQuery;

pub use tidecast_records::Record;

/// Remote store of raw records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record matching the query, all pages included.
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, AdapterError>;
}
