//! Bridge from the PocketBase client crate to the [`RecordStore`] trait.

use async_trait::async_trait;
use log::debug;
use tidecast_records::{FilterBuilder, PocketBaseClient, RecordStoreError};

use crate::errors::{Error, Result};
use crate::sources::errors::AdapterError;
use crate::sources::sources_model::RecordQuery;
use crate::sources::sources_traits::{Record, RecordStore};

pub struct PocketBaseRecordStore {
    client: PocketBaseClient,
}

impl PocketBaseRecordStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = PocketBaseClient::new(base_url)
            .map_err(|e| Error::Config(format!("POCKETBASE_URL: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_client(client: PocketBaseClient) -> Self {
        Self { client }
    }
}

/// Renders the PocketBase filter expression for a query.
pub(crate) fn render_filter(query: &RecordQuery) -> String {
    let mut filter = FilterBuilder::new()
        .at_or_after(&query.timestamp_field, query.start)
        .before(&query.timestamp_field, query.end);
    if let Some((field, value)) = &query.equals {
        filter = filter.equals(field, value);
    }
    filter.build()
}

fn fetch_error(collection: &str, err: RecordStoreError) -> AdapterError {
    AdapterError::Fetch {
        collection: collection.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl RecordStore for PocketBaseRecordStore {
    async fn query(&self, query: &RecordQuery) -> std::result::Result<Vec<Record>, AdapterError> {
        let filter = render_filter(query);
        debug!(
            "Querying '{}' at {} with filter: {}",
            query.collection,
            self.client.base_url(),
            filter
        );
        self.client
            .get_full_list(&query.collection, &filter)
            .await
            .map_err(|e| fetch_error(&query.collection, e))
    }
}
