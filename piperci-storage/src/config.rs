//! Storage configuration
//!
//! The backend is chosen explicitly through [`StorageBackendKind`]; there is
//! no lookup by name at runtime.

use crate::error::{Result, StorageError};

/// Region sent to Minio when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Object store implementations this crate can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendKind {
    /// Minio (or any S3-compatible store addressed with path-style URLs)
    #[default]
    Minio,
}

/// Connection settings for an object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub kind: StorageBackendKind,

    /// Host and optional port (e.g., "localhost:9000")
    pub endpoint: String,

    pub region: String,

    pub access_key: String,

    pub secret_key: String,

    /// Use https instead of http
    pub secure: bool,
}

impl StorageConfig {
    /// Minio settings with the default region over https
    pub fn minio(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: StorageBackendKind::Minio,
            endpoint: endpoint.into(),
            region: DEFAULT_REGION.to_string(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            secure: true,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Full endpoint URL including the scheme
    ///
    /// An endpoint that already carries `http://` or `https://` is kept
    /// as is and `secure` is ignored.
    pub fn endpoint_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, endpoint)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(StorageError::InvalidArgument(
                "storage endpoint cannot be empty".to_string(),
            ));
        }

        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(StorageError::Credentials(
                "access_key and secret_key must both be set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minio_defaults() {
        let config = StorageConfig::minio("localhost:9000", "ak", "sk");
        assert_eq!(config.kind, StorageBackendKind::Minio);
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(config.secure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url() {
        let config = StorageConfig::minio("localhost:9000", "ak", "sk");
        assert_eq!(config.endpoint_url(), "https://localhost:9000");

        let config = config.with_secure(false);
        assert_eq!(config.endpoint_url(), "http://localhost:9000");

        let config = StorageConfig::minio("http://storage:9000/", "ak", "sk");
        assert_eq!(config.endpoint_url(), "http://storage:9000");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorageConfig::minio("localhost:9000", "ak", "sk");

        config.endpoint = " ".to_string();
        assert!(matches!(config.validate(), Err(StorageError::InvalidArgument(_))));

        config.endpoint = "localhost:9000".to_string();
        config.secret_key = String::new();
        assert!(matches!(config.validate(), Err(StorageError::Credentials(_))));
    }
}
