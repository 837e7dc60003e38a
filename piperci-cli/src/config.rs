//! Configuration module
//!
//! Service endpoints and storage credentials for the `piperci` binary.

use anyhow::{Context, Result};
use piperci_client::{ArtManClient, GManClient};
use piperci_storage::{StorageClient, StorageConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of GMan (e.g., "http://localhost:8089")
    pub gman_url: String,

    /// URL of ArtMan (e.g., "http://localhost:8090")
    pub artman_url: String,

    /// Object store endpoint, with or without a scheme
    pub storage_url: Option<String>,

    pub storage_access_key: Option<String>,

    pub storage_secret_key: Option<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("gman_url", &self.gman_url), ("artman_url", &self.artman_url)] {
            if url.is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }

            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        Ok(())
    }

    pub fn gman(&self) -> GManClient {
        GManClient::new(&self.gman_url)
    }

    /// ArtMan client that resolves threads through the configured GMan
    pub fn artman(&self) -> ArtManClient {
        ArtManClient::new(&self.artman_url).with_gman_url(&self.gman_url)
    }

    /// Storage settings; fails when any storage option is missing
    pub fn storage_config(&self) -> Result<StorageConfig> {
        let endpoint = self
            .storage_url
            .as_deref()
            .context("--storage-url (PIPERCI_STORAGE_URL) is required for store commands")?;
        let access_key = self
            .storage_access_key
            .as_deref()
            .context("--storage-access-key (PIPERCI_STORAGE_ACCESS_KEY) is required")?;
        let secret_key = self
            .storage_secret_key
            .as_deref()
            .context("--storage-secret-key (PIPERCI_STORAGE_SECRET_KEY) is required")?;

        Ok(StorageConfig::minio(endpoint, access_key, secret_key))
    }

    pub fn storage(&self) -> Result<StorageClient> {
        let config = self.storage_config()?;
        StorageClient::from_config(&config)
            .with_context(|| format!("Failed to set up storage client for {}", config.endpoint))
    }
}
