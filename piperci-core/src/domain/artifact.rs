//! Artifact domain types

use serde::{Deserialize, Serialize};

use crate::domain::task::Task;

/// A stored build output registered against a task and its content digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    pub uri: String,
    pub sri: String,
    #[serde(rename = "type", default = "default_artifact_type")]
    pub artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

pub fn default_artifact_type() -> String {
    "artifact".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_deserializes_artman_payload() {
        let raw = r#"{
            "status": "unknown",
            "uri": "https://someminio.example.com/art1",
            "artifact_id": "884053a3-277b-45e4-9813-fc61c07a2cd6",
            "type": "artifact",
            "sri": "sha256-sCDaaxdshXhK4sA/v4dMHiMWhtGyQwA1fP8PgrN0O5g=",
            "task": {
                "task_id": "a9a1ca15-747d-43f9-8f04-1a66de8fef33",
                "caller": "test_case_create_1",
                "project": "gman_test_data",
                "thread_id": "a9a1ca15-747d-43f9-8f04-1a66de8fef33",
                "run_id": "create_1"
            },
            "event_id": "a48efe28-db9e-4330-93c4-5f480b2bef71"
        }"#;

        let artifact: Artifact = serde_json::from_str(raw).unwrap();
        assert_eq!(
            artifact.artifact_id.as_deref(),
            Some("884053a3-277b-45e4-9813-fc61c07a2cd6")
        );
        assert_eq!(artifact.artifact_type, "artifact");
        assert_eq!(artifact.task.unwrap().run_id, "create_1");
    }

    #[test]
    fn test_artifact_type_defaults() {
        let raw = r#"{"uri": "minio://host/bucket/obj", "sri": "sha256-abc="}"#;
        let artifact: Artifact = serde_json::from_str(raw).unwrap();
        assert_eq!(artifact.artifact_type, "artifact");
        assert!(artifact.artifact_id.is_none());
    }
}
