//! Error types for the PiperCI clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to GMan or ArtMan
#[derive(Debug, Error)]
pub enum ClientError {
    /// DNS, connect, or timeout failure before a status was received
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote service answered with a non-2xx status
    #[error("Remote error (status {status}): {body}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Caller supplied zero or several mutually exclusive identifiers,
    /// or a value the remote service would reject. No request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// GMan reports a failed task or thread
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Polling gave up before reaching a terminal state
    #[error("Timed out waiting for {what} after {attempts} attempt(s)")]
    Timeout {
        /// What was being waited on
        what: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Expected response header was absent
    #[error("Response is missing header {0}")]
    MissingHeader(String),
}

impl ClientError {
    /// Create a remote error from status code and body
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Remote { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Remote { status, .. } if *status >= 500)
    }
}
