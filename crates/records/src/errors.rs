use thiserror::Error;

/// Errors that can occur while talking to the remote record store.
#[derive(Error, Debug)]
pub enum RecordStoreError {
    /// The configured base URL is empty or malformed.
    #[error("Invalid record store URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Record store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to decode record store response: {0}")]
    Decode(String),
}

impl RecordStoreError {
    /// Returns true if retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RecordStoreError::Network(e) => e.is_timeout() || e.is_connect(),
            RecordStoreError::Status { status, .. } => *status == 429 || *status >= 500,
            RecordStoreError::InvalidUrl(_) | RecordStoreError::Decode(_) => false,
        }
    }
}
