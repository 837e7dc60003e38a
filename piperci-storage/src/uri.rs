//! `minio://host[:port]/bucket/object...` URIs

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StorageError};

/// The only scheme accepted by [`StorageUri::parse`]
pub const STORAGE_SCHEME: &str = "minio";

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUri {
    /// Host and optional port, kept for display only; requests go to the
    /// configured endpoint
    pub host: String,
    pub bucket: String,
    /// Every path segment after the bucket, joined with `/`
    pub object: String,
}

impl StorageUri {
    /// Parse a storage URI
    ///
    /// Fails with [`StorageError::InvalidArgument`] for any other scheme, or
    /// when the bucket or object name is missing. Query strings and fragments
    /// are dropped.
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| StorageError::InvalidArgument(format!("Not a URI: {}", uri)))?;

        if !scheme.eq_ignore_ascii_case(STORAGE_SCHEME) {
            return Err(StorageError::InvalidArgument(format!(
                "Unknown URI scheme: {}",
                scheme
            )));
        }

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));

        let mut segments = path.split('/');
        let bucket = segments.next().unwrap_or_default();
        let object = segments.collect::<Vec<_>>().join("/");

        if bucket.is_empty() {
            return Err(StorageError::InvalidArgument(format!(
                "URI has no bucket: {}",
                uri
            )));
        }
        if object.is_empty() {
            return Err(StorageError::InvalidArgument(format!(
                "URI has no object name: {}",
                uri
            )));
        }

        Ok(Self {
            host: host.to_string(),
            bucket: bucket.to_string(),
            object,
        })
    }
}

impl FromStr for StorageUri {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}",
            STORAGE_SCHEME, self.host, self.bucket, self.object
        )
    }
}
