use thiserror::Error;

/// Errors raised while pulling records from a remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("No record store is configured")]
    NotConfigured,

    #[error("Failed to fetch records from '{collection}': {message}")]
    Fetch { collection: String, message: String },
}
