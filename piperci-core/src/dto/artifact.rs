//! Artifact DTOs sent to ArtMan

use serde::{Deserialize, Serialize};

use crate::domain::artifact::default_artifact_type;

/// Body of `POST /artifact`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtifact {
    pub task_id: String,
    pub uri: String,
    pub sri: String,
    pub caller: String,
    #[serde(rename = "type", default = "default_artifact_type")]
    pub artifact_type: String,
}

impl NewArtifact {
    pub fn new(
        task_id: impl Into<String>,
        uri: impl Into<String>,
        sri: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            uri: uri.into(),
            sri: sri.into(),
            caller: caller.into(),
            artifact_type: default_artifact_type(),
        }
    }
}
