//! Storage-specific error types for CSV files.
//!
//! Converted to the storage-agnostic `tidecast_core::errors::StorageError`
//! before being returned to callers.

use std::path::PathBuf;
use thiserror::Error;
use tidecast_core::errors::{Error, StorageError as CoreStorageError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Invalid header in {}: {message}", .path.display())]
    Header { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        let core = match err {
            StorageError::Read { .. } => CoreStorageError::ReadFailed(message),
            StorageError::Write { .. } => CoreStorageError::WriteFailed(message),
            StorageError::Csv { .. } | StorageError::Header { .. } => {
                CoreStorageError::Corrupt(message)
            }
            StorageError::Serialization(_) | StorageError::Task(_) => {
                CoreStorageError::Internal(message)
            }
        };
        Error::Storage(core)
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::Task(err.to_string())
    }
}

/// Extension trait for converting storage Results to core Results.
pub trait IntoCore<T> {
    fn into_core(self) -> tidecast_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> tidecast_core::Result<T> {
        self.map_err(Error::from)
    }
}
