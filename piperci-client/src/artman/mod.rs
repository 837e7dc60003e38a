//! ArtMan client
//!
//! ArtMan records which stored object (uri) holds which content (SRI) for
//! which task. Thread lookups go through GMan to resolve the thread's tasks.

mod artifacts;

pub use artifacts::ARTIFACT_STATUS_HEADER;

use reqwest::Client;

use crate::GManClient;

/// HTTP client for the ArtMan API
#[derive(Debug, Clone)]
pub struct ArtManClient {
    /// Base URL of ArtMan (e.g., "http://localhost:8090")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Used to resolve thread ids into task ids
    gman: GManClient,
}

impl ArtManClient {
    /// Create a new ArtMan client
    ///
    /// GMan is assumed to be served from the same base URL until
    /// [`ArtManClient::with_gman_url`] says otherwise.
    ///
    /// # Example
    /// ```
    /// use piperci_client::ArtManClient;
    ///
    /// let client = ArtManClient::new("http://localhost:8090")
    ///     .with_gman_url("http://localhost:8089");
    /// assert_eq!(client.gman().base_url(), "http://localhost:8089");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new ArtMan client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            gman: GManClient::with_client(base_url.clone(), client.clone()),
            base_url,
            client,
        }
    }

    /// Resolve thread lookups against a separate GMan instance
    pub fn with_gman_url(mut self, gman_url: impl Into<String>) -> Self {
        self.gman = GManClient::with_client(gman_url, self.client.clone());
        self
    }

    /// Get the base URL of ArtMan
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The GMan client used for thread lookups
    pub fn gman(&self) -> &GManClient {
        &self.gman
    }
}
