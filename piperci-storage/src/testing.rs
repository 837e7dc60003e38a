//! In-memory object store used by the client tests

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::backend::{ObjectBackend, ObjectInfo, ObjectPage};
use crate::error::{Result, StorageError};

type Buckets = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// Object store kept in a map, with S3-like bucket rules and paging
#[derive(Debug)]
pub struct MemoryBackend {
    buckets: Mutex<Buckets>,
    /// Buckets that exist but belong to someone else
    foreign: BTreeSet<String>,
    page_size: usize,
    calls: AtomicUsize,
    make_bucket_calls: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            buckets: Mutex::new(BTreeMap::new()),
            foreign: BTreeSet::new(),
            page_size: 1000,
            calls: AtomicUsize::new(0),
            make_bucket_calls: AtomicUsize::new(0),
        }
    }
}

impl MemoryBackend {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_foreign_bucket(mut self, bucket: &str) -> Self {
        self.foreign.insert(bucket.to_string());
        self.buckets
            .get_mut()
            .unwrap()
            .insert(bucket.to_string(), BTreeMap::new());
        self
    }

    /// Number of backend operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn make_bucket_calls(&self) -> usize {
        self.make_bucket_calls.load(Ordering::SeqCst)
    }

    pub fn object(&self, bucket: &str, object: &str) -> Option<Vec<u8>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|objects| objects.get(object).cloned())
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn no_such_bucket(bucket: &str) -> StorageError {
    StorageError::Backend(format!("HTTP 404: NoSuchBucket {}", bucket))
}

fn info(bucket: &str, name: &str, data: &[u8]) -> ObjectInfo {
    ObjectInfo {
        bucket: bucket.to_string(),
        name: name.to_string(),
        size: data.len() as u64,
        etag: Some(format!("\"{:x}\"", data.iter().map(|b| *b as u64).sum::<u64>())),
        last_modified: Some("2024-01-01T00:00:00.000Z".to_string()),
        is_dir: false,
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn make_bucket(&self, bucket: &str) -> Result<()> {
        self.record();
        self.make_bucket_calls.fetch_add(1, Ordering::SeqCst);

        let valid = !bucket.is_empty()
            && bucket
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
        if !valid {
            return Err(StorageError::Backend(format!(
                "HTTP 400: InvalidBucketName {}",
                bucket
            )));
        }

        if self.foreign.contains(bucket) {
            return Err(StorageError::BucketAlreadyExists(bucket.to_string()));
        }

        let mut buckets = self.buckets.lock().unwrap();
        if buckets.contains_key(bucket) {
            return Err(StorageError::BucketAlreadyOwnedByYou(bucket.to_string()));
        }
        buckets.insert(bucket.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn put_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()> {
        self.record();
        let data = std::fs::read(path).map_err(|e| StorageError::io(path, e))?;

        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.insert(object.to_string(), data);
        Ok(())
    }

    async fn stat_object(&self, bucket: &str, object: &str) -> Result<ObjectInfo> {
        self.record();
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        let data = objects
            .get(object)
            .ok_or_else(|| StorageError::Backend(format!("HTTP 404: NoSuchKey {}", object)))?;
        Ok(info(bucket, object, data))
    }

    async fn get_file(&self, bucket: &str, object: &str, path: &Path) -> Result<()> {
        self.record();
        let data = self
            .object(bucket, object)
            .ok_or_else(|| StorageError::Backend(format!("HTTP 404: NoSuchKey {}", object)))?;
        std::fs::write(path, data).map_err(|e| StorageError::io(path, e))
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        recursive: bool,
        token: Option<String>,
    ) -> Result<ObjectPage> {
        self.record();
        let prefix = prefix.unwrap_or_default();
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;

        let mut entries = BTreeMap::new();
        for (key, data) in objects.range(prefix.to_string()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };
            match rest.find('/') {
                Some(slash) if !recursive => {
                    let dir = format!("{}{}", prefix, &rest[..=slash]);
                    entries.insert(dir.clone(), ObjectInfo::dir(bucket, dir));
                }
                _ => {
                    entries.insert(key.clone(), info(bucket, key, data));
                }
            }
        }

        let total = entries.len();
        let start: usize = token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(total);
        Ok(ObjectPage {
            objects: entries.into_values().skip(start).take(end - start).collect(),
            next_token: (end < total).then(|| end.to_string()),
        })
    }
}
