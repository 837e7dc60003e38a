//! Capability interface implemented by each object store

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Metadata of one stored object, or of a pseudo-directory in a
/// non-recursive listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub bucket: String,
    pub name: String,
    pub size: u64,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// Common prefix standing for everything below it
    pub is_dir: bool,
}

impl ObjectInfo {
    pub(crate) fn dir(bucket: &str, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.to_string(),
            name: prefix.into(),
            size: 0,
            etag: None,
            last_modified: None,
            is_dir: true,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectInfo>,
    /// Token for the next page; `None` on the last one
    pub next_token: Option<String>,
}

/// Operations every object store backend provides
///
/// `make_bucket` must report an existing bucket as
/// [`StorageError::BucketAlreadyOwnedByYou`](crate::StorageError::BucketAlreadyOwnedByYou)
/// or [`StorageError::BucketAlreadyExists`](crate::StorageError::BucketAlreadyExists)
/// so the client can treat it as success.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn make_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload a local file as `object`
    async fn put_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()>;

    async fn stat_object(&self, bucket: &str, object: &str) -> Result<ObjectInfo>;

    /// Download `object` into a local file, replacing it if present
    async fn get_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()>;

    /// Fetch one page of objects under `prefix`
    ///
    /// Without `recursive`, keys are grouped at the next `/` after the
    /// prefix and reported as directory entries.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        recursive: bool,
        token: Option<String>,
    ) -> Result<ObjectPage>;
}
