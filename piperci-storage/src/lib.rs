//! PiperCI Object Storage
//!
//! Wraps an S3-compatible object store with the three operations pipeline
//! steps need: idempotent upload, download by `minio://` URI, and lazy
//! listing.
//!
//! # Example
//!
//! ```no_run
//! use futures_util::TryStreamExt;
//! use piperci_storage::{StorageClient, StorageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StorageConfig::minio("localhost:9000", "minio", "minio123").with_secure(false);
//!     let storage = StorageClient::from_config(&config)?;
//!
//!     storage
//!         .provision_and_upload("artifacts", "run-1/out.tar.gz", "out.tar.gz".as_ref())
//!         .await?;
//!
//!     let objects: Vec<_> = storage
//!         .list_objects("artifacts", Some("run-1/"), true)
//!         .try_collect()
//!         .await?;
//!     println!("{} objects", objects.len());
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
pub mod error;
mod minio;
mod uri;

#[cfg(test)]
mod testing;

use std::path::Path;

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

pub use backend::{ObjectBackend, ObjectInfo, ObjectPage};
pub use config::{DEFAULT_REGION, StorageBackendKind, StorageConfig};
pub use error::{Result, StorageError};
pub use minio::MinioBackend;
pub use uri::{STORAGE_SCHEME, StorageUri};

/// Object store client over a pluggable backend
#[derive(Debug, Clone)]
pub struct StorageClient<B = MinioBackend> {
    backend: B,
}

impl StorageClient<MinioBackend> {
    /// Create a client for the backend named in `config`
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        config.validate()?;

        match config.kind {
            StorageBackendKind::Minio => Ok(Self::new(MinioBackend::new(config)?)),
        }
    }
}

impl<B: ObjectBackend> StorageClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Upload a local file, creating the bucket first if needed
    ///
    /// A bucket that already exists is not an error, so repeated uploads of
    /// the same object succeed. Returns the stored object's metadata.
    pub async fn provision_and_upload(
        &self,
        bucket: &str,
        object: &str,
        path: &Path,
    ) -> Result<ObjectInfo> {
        match self.backend.make_bucket(bucket).await {
            Ok(()) => info!("Created bucket {}", bucket),
            Err(e) if e.is_bucket_exists() => warn!("{}, reusing it", e),
            Err(e) => return Err(e),
        }

        self.backend.put_file(bucket, object, path).await?;
        let stat = self.backend.stat_object(bucket, object).await?;

        info!("Uploaded {} to {}/{} ({} bytes)", path.display(), bucket, object, stat.size);
        Ok(stat)
    }

    /// Download the object named by a `minio://host/bucket/object` URI
    ///
    /// The URI is validated before any network or filesystem access; the
    /// request goes to the configured endpoint regardless of the URI host.
    pub async fn download(&self, uri: &str, path: &Path) -> Result<StorageUri> {
        let location = StorageUri::parse(uri)?;
        self.download_object(&location.bucket, &location.object, path)
            .await?;
        Ok(location)
    }

    /// Download `bucket/object` to `path`
    ///
    /// An existing file at `path` is only replaced once the whole object
    /// has arrived.
    pub async fn download_object(&self, bucket: &str, object: &str, path: &Path) -> Result<()> {
        self.backend.get_file(bucket, object, path).await?;

        info!("Downloaded {}/{} to {}", bucket, object, path.display());
        Ok(())
    }

    /// Metadata of a stored object
    pub async fn stat(&self, bucket: &str, object: &str) -> Result<ObjectInfo> {
        self.backend.stat_object(bucket, object).await
    }

    /// Lazily list objects under `prefix`
    ///
    /// Nothing is requested until the stream is polled; pages are fetched
    /// as the previous one is consumed. Every call starts a fresh listing.
    /// Without `recursive`, keys below the next `/` collapse into a single
    /// entry with `is_dir` set.
    pub fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        recursive: bool,
    ) -> BoxStream<'_, Result<ObjectInfo>> {
        let backend = &self.backend;
        let start = ListCursor {
            bucket: bucket.to_string(),
            prefix: prefix.map(str::to_string),
            token: None,
        };

        stream::try_unfold(Some(start), move |cursor| async move {
            let Some(mut cursor) = cursor else {
                return Ok(None);
            };

            debug!("Listing {} (prefix {:?})", cursor.bucket, cursor.prefix);
            let page = backend
                .list_page(
                    &cursor.bucket,
                    cursor.prefix.as_deref(),
                    recursive,
                    cursor.token.take(),
                )
                .await?;

            let next = page.next_token.map(|token| ListCursor {
                token: Some(token),
                ..cursor
            });
            Ok::<_, StorageError>(Some((page.objects, next)))
        })
        .map_ok(|objects| stream::iter(objects.into_iter().map(Ok::<_, StorageError>)))
        .try_flatten()
        .boxed()
    }
}

struct ListCursor {
    bucket: String,
    prefix: Option<String>,
    token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use std::io::Write;

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    fn names(objects: &[ObjectInfo]) -> Vec<&str> {
        objects.iter().map(|o| o.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_upload_creates_bucket_and_returns_stat() {
        let storage = StorageClient::new(MemoryBackend::default());
        let file = temp_file(b"build output");

        let stat = storage
            .provision_and_upload("artifacts", "run-1/out.txt", file.path())
            .await
            .unwrap();

        assert_eq!(stat.bucket, "artifacts");
        assert_eq!(stat.name, "run-1/out.txt");
        assert_eq!(stat.size, 12);
        assert!(stat.etag.is_some());
    }

    #[tokio::test]
    async fn test_upload_twice_is_idempotent() {
        let storage = StorageClient::new(MemoryBackend::default());
        let file = temp_file(b"v1");

        storage
            .provision_and_upload("artifacts", "out.txt", file.path())
            .await
            .unwrap();
        let stat = storage
            .provision_and_upload("artifacts", "out.txt", file.path())
            .await
            .unwrap();

        assert_eq!(stat.size, 2);
        assert_eq!(storage.backend().make_bucket_calls(), 2);
    }

    #[tokio::test]
    async fn test_upload_into_foreign_bucket_is_swallowed() {
        let storage = StorageClient::new(MemoryBackend::default().with_foreign_bucket("shared"));
        let file = temp_file(b"data");

        let stat = storage
            .provision_and_upload("shared", "obj", file.path())
            .await
            .unwrap();
        assert_eq!(stat.size, 4);
    }

    #[tokio::test]
    async fn test_upload_other_bucket_errors_are_fatal() {
        let storage = StorageClient::new(MemoryBackend::default());
        let file = temp_file(b"data");

        let err = storage
            .provision_and_upload("Bad_Bucket", "obj", file.path())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(storage.backend().object("Bad_Bucket", "obj").is_none());
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let storage = StorageClient::new(MemoryBackend::default());
        let err = storage
            .provision_and_upload("artifacts", "obj", Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_download_by_uri() {
        let storage = StorageClient::new(MemoryBackend::default());
        let file = temp_file(b"nested payload");
        storage
            .provision_and_upload("artifacts", "run-1/logs/out.txt", file.path())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let location = storage
            .download("minio://storage:9000/artifacts/run-1/logs/out.txt", &target)
            .await
            .unwrap();

        assert_eq!(location.object, "run-1/logs/out.txt");
        assert_eq!(std::fs::read(&target).unwrap(), b"nested payload");
    }

    #[tokio::test]
    async fn test_download_object_by_bucket_and_key() {
        let storage = StorageClient::new(MemoryBackend::default());
        let file = temp_file(b"direct");
        storage
            .provision_and_upload("artifacts", "run-1/out.txt", file.path())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        storage
            .download_object("artifacts", "run-1/out.txt", &target)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"direct");
        assert_eq!(storage.backend().calls(), 4);
    }

    #[tokio::test]
    async fn test_download_wrong_scheme_touches_nothing() {
        let storage = StorageClient::new(MemoryBackend::default());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let err = storage
            .download("http://storage:9000/artifacts/out.txt", &target)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::InvalidArgument(_)));
        assert_eq!(storage.backend().calls(), 0);
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let storage = StorageClient::new(MemoryBackend::default());
        let dir = tempfile::tempdir().unwrap();

        let err = storage
            .download("minio://host/artifacts/nope", &dir.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }

    async fn seeded() -> StorageClient<MemoryBackend> {
        let storage = StorageClient::new(MemoryBackend::default().with_page_size(2));
        let file = temp_file(b"x");
        for name in ["a.txt", "b/1.txt", "b/2.txt", "b/c/3.txt", "d.txt"] {
            storage
                .provision_and_upload("artifacts", name, file.path())
                .await
                .unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn test_list_objects_recursive_spans_pages() {
        let storage = seeded().await;

        let objects: Vec<ObjectInfo> = storage
            .list_objects("artifacts", None, true)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(names(&objects), vec!["a.txt", "b/1.txt", "b/2.txt", "b/c/3.txt", "d.txt"]);
        assert!(objects.iter().all(|o| !o.is_dir));
    }

    #[tokio::test]
    async fn test_list_objects_non_recursive_reports_directories() {
        let storage = seeded().await;

        let top: Vec<ObjectInfo> = storage
            .list_objects("artifacts", None, false)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(names(&top), vec!["a.txt", "b/", "d.txt"]);
        assert!(top[1].is_dir);

        let under_b: Vec<ObjectInfo> = storage
            .list_objects("artifacts", Some("b/"), false)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(names(&under_b), vec!["b/1.txt", "b/2.txt", "b/c/"]);
    }

    #[tokio::test]
    async fn test_list_objects_is_lazy_and_restartable() {
        let storage = seeded().await;
        let before = storage.backend().calls();

        let stream = storage.list_objects("artifacts", None, true);
        assert_eq!(storage.backend().calls(), before);

        let first: Vec<ObjectInfo> = stream.try_collect().await.unwrap();
        let second: Vec<ObjectInfo> = storage
            .list_objects("artifacts", None, true)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first, second);
        // 5 objects at 2 per page, twice
        assert_eq!(storage.backend().calls() - before, 6);
    }

    #[tokio::test]
    async fn test_list_objects_stops_after_error() {
        let storage = StorageClient::new(MemoryBackend::default());

        let mut stream = storage.list_objects("missing", None, true);
        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(StorageError::Backend(_))));
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_from_config_validates() {
        let config = StorageConfig::minio("", "ak", "sk");
        assert!(matches!(
            StorageClient::from_config(&config),
            Err(StorageError::InvalidArgument(_))
        ));

        let config = StorageConfig::minio("localhost:9000", "ak", "sk");
        assert!(StorageClient::from_config(&config).is_ok());
    }
}
