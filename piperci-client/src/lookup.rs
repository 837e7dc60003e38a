//! Artifact lookup keys
//!
//! ArtMan can be queried by several identifiers, but only one at a time.
//! Callers holding a set of optional identifiers (CLI flags, request
//! parameters) convert them once with `from_options`; everything past that
//! point works with a single, already-validated key.

use piperci_sri::Digest;

use crate::error::{ClientError, Result};

/// Key for [`ArtManClient::get_artifacts`](crate::ArtManClient::get_artifacts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLookup {
    /// URL-safe SRI of the artifact content
    BySri(String),
    ByArtifactId(String),
    ByTaskId(String),
    /// Every artifact of every task in the thread
    ByThreadId(String),
}

/// Key for [`ArtManClient::artifact_exists`](crate::ArtManClient::artifact_exists)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistsLookup {
    /// URL-safe SRI of the artifact content
    BySri(String),
    ByTaskId(String),
}

impl ArtifactLookup {
    /// Look up by content digest
    pub fn digest(digest: &Digest) -> Self {
        ArtifactLookup::BySri(digest.to_url_safe())
    }

    /// Build a lookup from optional identifiers, exactly one of which must be set
    ///
    /// Empty strings count as unset.
    pub fn from_options(
        sri_urlsafe: Option<String>,
        artifact_id: Option<String>,
        task_id: Option<String>,
        thread_id: Option<String>,
    ) -> Result<Self> {
        let (name, value) = exactly_one([
            ("sri_urlsafe", sri_urlsafe),
            ("artifact_id", artifact_id),
            ("task_id", task_id),
            ("thread_id", thread_id),
        ])?;

        Ok(match name {
            "sri_urlsafe" => ArtifactLookup::BySri(value),
            "artifact_id" => ArtifactLookup::ByArtifactId(value),
            "task_id" => ArtifactLookup::ByTaskId(value),
            _ => ArtifactLookup::ByThreadId(value),
        })
    }
}

impl ExistsLookup {
    /// Look up by content digest
    pub fn digest(digest: &Digest) -> Self {
        ExistsLookup::BySri(digest.to_url_safe())
    }

    /// Build a lookup from optional identifiers, exactly one of which must be set
    pub fn from_options(sri_urlsafe: Option<String>, task_id: Option<String>) -> Result<Self> {
        let (name, value) = exactly_one([("sri_urlsafe", sri_urlsafe), ("task_id", task_id)])?;

        Ok(match name {
            "sri_urlsafe" => ExistsLookup::BySri(value),
            _ => ExistsLookup::ByTaskId(value),
        })
    }
}

fn exactly_one<const N: usize>(
    candidates: [(&'static str, Option<String>); N],
) -> Result<(&'static str, String)> {
    let names: Vec<&str> = candidates.iter().map(|(name, _)| *name).collect();
    let mut given: Vec<(&'static str, String)> = candidates
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect();

    match given.len() {
        1 => Ok(given.remove(0)),
        0 => Err(ClientError::InvalidArgument(format!(
            "One of {} must be provided.",
            names.join(", ")
        ))),
        _ => Err(ClientError::InvalidArgument(format!(
            "Multiple exclusive arguments given ({}). You must pass exactly one of {}.",
            given.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", "),
            names.join(", ")
        ))),
    }
}
