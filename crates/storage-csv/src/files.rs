//! Data directory layout and atomic file replacement.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tidecast_core::constants::{FORECAST_FILE_SUFFIX, SERIES_FILE_SUFFIX};
use tidecast_core::entities::EntityName;

use crate::errors::StorageError;

/// Root directory holding every entity's CSV files.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Opens the directory, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StorageError::Write {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn series_path(&self, entity: &EntityName) -> PathBuf {
        self.root
            .join(format!("{}{}.csv", entity, SERIES_FILE_SUFFIX))
    }

    pub fn forecast_path(&self, entity: &EntityName) -> PathBuf {
        self.root
            .join(format!("{}{}.csv", entity, FORECAST_FILE_SUFFIX))
    }
}

/// Reads a file, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces `path` with `contents` via a temp file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Removes a file; returns whether it existed.
pub fn remove_if_exists(path: &Path) -> Result<bool, StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
