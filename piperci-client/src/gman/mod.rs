//! GMan client
//!
//! GMan is the task/event ledger. Tasks are created with an initial status,
//! updated by appending events, and grouped into threads.

mod tasks;
mod threads;

pub use threads::THREAD_STATUS_HEADERS;

use reqwest::Client;

use crate::polling::Poller;

/// HTTP client for the GMan API
///
/// Endpoints are grouped by resource:
/// - Tasks: create, update, list events, wait for a status
/// - Threads: list tasks and events, read aggregate counts, wait for completion
#[derive(Debug, Clone)]
pub struct GManClient {
    /// Base URL of GMan (e.g., "http://localhost:8089")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Drives the `wait_*` helpers
    poller: Poller,
}

impl GManClient {
    /// Create a new GMan client
    ///
    /// # Example
    /// ```
    /// use piperci_client::GManClient;
    ///
    /// let client = GManClient::new("http://localhost:8089");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new GMan client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            poller: Poller::default(),
        }
    }

    /// Replace the poller used by the `wait_*` helpers
    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    /// Get the base URL of GMan
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
