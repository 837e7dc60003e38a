//! Storage error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while talking to the object store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Bad URI, bucket or object name; raised before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The bucket exists and belongs to the caller
    #[error("Bucket {0} already owned by you")]
    BucketAlreadyOwnedByYou(String),

    /// The bucket exists under another owner
    #[error("Bucket {0} already exists")]
    BucketAlreadyExists(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store rejected the request or could not be reached
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid storage credentials: {0}")]
    Credentials(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether bucket creation failed only because the bucket is already there
    pub fn is_bucket_exists(&self) -> bool {
        matches!(
            self,
            StorageError::BucketAlreadyOwnedByYou(_) | StorageError::BucketAlreadyExists(_)
        )
    }
}
