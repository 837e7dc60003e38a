//! Minio backend over the S3 API

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use s3::BucketConfiguration;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::backend::{ObjectBackend, ObjectInfo, ObjectPage};
use crate::config::StorageConfig;
use crate::error::{Result, StorageError};

/// Talks to Minio with path-style addressing (`endpoint/bucket/object`)
#[derive(Clone)]
pub struct MinioBackend {
    region: Region,
    credentials: Credentials,
}

impl fmt::Debug for MinioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinioBackend")
            .field("endpoint", &self.region.endpoint())
            .finish()
    }
}

impl MinioBackend {
    /// Build a backend from connection settings; no request is made
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Credentials(e.to_string()))?;

        Ok(Self {
            region: Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint_url(),
            },
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(backend_error)?;
        Ok(bucket.with_path_style())
    }
}

#[async_trait]
impl ObjectBackend for MinioBackend {
    async fn make_bucket(&self, bucket: &str) -> Result<()> {
        debug!("Creating bucket {}", bucket);
        let result = Bucket::create_with_path_style(
            bucket,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => Ok(()),
            Ok(response) => Err(create_bucket_error(
                bucket,
                response.response_code,
                &response.response_text,
            )),
            Err(S3Error::HttpFailWithBody(status, body)) => {
                Err(create_bucket_error(bucket, status, &body))
            }
            Err(e) => Err(backend_error(e)),
        }
    }

    async fn put_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| StorageError::io(path, e))?;

        debug!("Uploading {} to {}/{}", path.display(), bucket, object);
        self.bucket(bucket)?
            .put_object_stream(&mut file, object)
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn stat_object(&self, bucket: &str, object: &str) -> Result<ObjectInfo> {
        let (head, _) = self
            .bucket(bucket)?
            .head_object(object)
            .await
            .map_err(backend_error)?;

        Ok(ObjectInfo {
            bucket: bucket.to_string(),
            name: object.to_string(),
            size: head
                .content_length
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(0),
            etag: head.e_tag,
            last_modified: head.last_modified,
            is_dir: false,
        })
    }

    async fn get_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // removed on drop unless persisted over `path`
        let (partial, partial_path) = tempfile::Builder::new()
            .prefix(".piperci-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| StorageError::io(path, e))?
            .into_parts();
        let mut file = tokio::fs::File::from_std(partial);

        debug!("Downloading {}/{} to {}", bucket, object, path.display());
        let status = self
            .bucket(bucket)?
            .get_object_to_writer(object, &mut file)
            .await
            .map_err(backend_error)?;
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "Unable to download {}/{}: HTTP {}",
                bucket, object, status
            )));
        }

        file.flush().await.map_err(|e| StorageError::io(path, e))?;
        drop(file);

        partial_path
            .persist(path)
            .map_err(|e| StorageError::io(path, e.error))
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        recursive: bool,
        token: Option<String>,
    ) -> Result<ObjectPage> {
        let delimiter = (!recursive).then(|| "/".to_string());
        let (result, _) = self
            .bucket(bucket)?
            .list_page(
                prefix.unwrap_or_default().to_string(),
                delimiter,
                token,
                None,
                None,
            )
            .await
            .map_err(backend_error)?;

        let mut objects: Vec<ObjectInfo> = result
            .common_prefixes
            .unwrap_or_default()
            .into_iter()
            .map(|common| ObjectInfo::dir(bucket, common.prefix))
            .collect();
        objects.extend(result.contents.into_iter().map(|object| ObjectInfo {
            bucket: bucket.to_string(),
            name: object.key,
            size: object.size,
            etag: object.e_tag,
            last_modified: Some(object.last_modified),
            is_dir: false,
        }));
        objects.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ObjectPage {
            objects,
            next_token: result
                .next_continuation_token
                .filter(|_| result.is_truncated),
        })
    }
}

/// Map a failed CreateBucket response onto the two "already there" errors
fn create_bucket_error(bucket: &str, status: u16, body: &str) -> StorageError {
    if body.contains("BucketAlreadyOwnedByYou") {
        StorageError::BucketAlreadyOwnedByYou(bucket.to_string())
    } else if body.contains("BucketAlreadyExists") {
        StorageError::BucketAlreadyExists(bucket.to_string())
    } else {
        StorageError::Backend(format!(
            "Unable to create bucket {}: HTTP {}: {}",
            bucket, status, body
        ))
    }
}

fn backend_error(err: S3Error) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(status, body) => {
            StorageError::Backend(format!("HTTP {}: {}", status, body))
        }
        other => StorageError::Backend(other.to_string()),
    }
}
