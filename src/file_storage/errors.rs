//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    // Object errors
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Request body error: {0}")]
    Body(String),

    // Configuration errors
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    // Backend errors
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::ObjectNotFound(_) => 404,
            StorageError::InvalidName(_) => 400,
            StorageError::Body(_) => 400,
            StorageError::InvalidConnectionString(_) => 500,
            StorageError::Backend(_) => 502,
            StorageError::IoError(_) => 502,
        }
    }
}

impl From<object_store::Error> for StorageError {
    fn from(e: object_store::Error) -> Self {
        match e {
            object_store::Error::NotFound { path, .. } => StorageError::ObjectNotFound(path),
            object_store::Error::InvalidPath { source } => {
                StorageError::InvalidName(source.to_string())
            }
            other => StorageError::Backend(other.to_string()),
        }
    }
}

impl From<object_store::path::Error> for StorageError {
    fn from(e: object_store::path::Error) -> Self {
        StorageError::InvalidName(e.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e.to_string())
    }
}
