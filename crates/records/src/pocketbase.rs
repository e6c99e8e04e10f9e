//! PocketBase REST client.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::RecordStoreError;

/// A raw record as returned by the store.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page (PocketBase caps this at 500).
const DEFAULT_PAGE_SIZE: u32 = 500;

/// Hard stop against a store that keeps reporting more pages.
const MAX_PAGES: u32 = 10_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    page: u32,
    total_pages: u32,
    items: Vec<Record>,
}

/// Client for the PocketBase records API.
///
/// ```ignore
/// let client = PocketBaseClient::new("http://127.0.0.1:8090")?;
/// let records = client.get_full_list("sales_records", "amount > 0").await?;
/// ```
#[derive(Debug, Clone)]
pub struct PocketBaseClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl PocketBaseClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RecordStoreError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RecordStoreError::InvalidUrl(base_url));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, collection: &str) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    /// Fetches every record of `collection` matching `filter`, following pagination.
    pub async fn get_full_list(
        &self,
        collection: &str,
        filter: &str,
    ) -> Result<Vec<Record>, RecordStoreError> {
        let url = self.records_url(collection);
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let list = self.fetch_page(&url, filter, page).await?;
            let total_pages = list.total_pages;
            debug!(
                "Fetched page {}/{} of '{}' ({} records)",
                list.page,
                total_pages,
                collection,
                list.items.len()
            );
            records.extend(list.items);

            if page >= total_pages || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn fetch_page(
        &self,
        url: &str,
        filter: &str,
        page: u32,
    ) -> Result<ListResponse, RecordStoreError> {
        let page_param = page.to_string();
        let per_page_param = self.page_size.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("page", page_param.as_str()),
            ("perPage", per_page_param.as_str()),
            ("skipTotal", "0"),
        ];
        if !filter.is_empty() {
            query.push(("filter", filter));
        }

        let response = self.client.get(url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecordStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        decode_list(&bytes)
    }
}

fn decode_list(bytes: &[u8]) -> Result<ListResponse, RecordStoreError> {
    serde_json::from_slice(bytes).map_err(|e| RecordStoreError::Decode(e.to_string()))
}
