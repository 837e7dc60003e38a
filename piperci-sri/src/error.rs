//! Error types for SRI handling

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for SRI operations
pub type Result<T> = std::result::Result<T, SriError>;

/// Errors that can occur while computing or decoding digests
#[derive(Debug, Error)]
pub enum SriError {
    /// The file to hash could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Digest name is not one this crate can compute
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Text is not of the form `<algorithm>-<base64>`
    #[error("Malformed SRI string: {0}")]
    Parse(String),

    /// URL-safe wrapper is not valid base64 or does not hold a valid SRI
    #[error("Failed to decode URL-safe SRI: {0}")]
    Decode(String),

    /// Digest value does not match the algorithm's output size
    #[error("{algorithm} digest must be {expected} bytes, got {actual}")]
    InvalidLength {
        algorithm: String,
        expected: usize,
        actual: usize,
    },

    /// Value passed to rebuild a digest is neither raw bytes nor base64 text
    #[error("Invalid digest value: {0}")]
    InvalidValue(String),
}

impl SriError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
