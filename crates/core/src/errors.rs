//! Core error types for the Tidecast pipeline.
//!
//! This module defines storage-agnostic error types. Backend-specific errors
//! (CSV, filesystem, HTTP) are converted to these types by the crates that
//! own those backends.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Entity not configured: {0}")]
    UnknownEntity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for persistence operations.
///
/// Uses `String` for all details so the storage crate can convert its own
/// I/O and CSV errors into this format.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file exists but could not be read.
    #[error("Failed to read stored data: {0}")]
    ReadFailed(String),

    /// The stored data could not be interpreted at all.
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    /// Writing or replacing the stored data failed.
    #[error("Failed to write stored data: {0}")]
    WriteFailed(String),

    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Errors that occur during input validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Unexpected(format!("background task failed: {}", err))
    }
}
