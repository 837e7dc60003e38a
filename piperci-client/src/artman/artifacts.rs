//! Artifact endpoints

use piperci_core::domain::artifact::Artifact;
use piperci_core::dto::artifact::NewArtifact;
use reqwest::StatusCode;
use tracing::debug;

use crate::ArtManClient;
use crate::Filter;
use crate::error::{ClientError, Result};
use crate::lookup::{ArtifactLookup, ExistsLookup};
use crate::response::{
    apply_filter, check_status, endpoint, handle_list_response, handle_response, header_str,
};

/// Header carrying an artifact's status on `HEAD /artifact/{id}`
pub const ARTIFACT_STATUS_HEADER: &str = "x-gman-artifact-status";

impl ArtManClient {
    // =============================================================================
    // Artifact Registration
    // =============================================================================

    /// Register a new artifact
    ///
    /// ArtMan rejects duplicates; check with [`ArtManClient::artifact_exists`]
    /// first when the same content may already be registered.
    ///
    /// # Example
    /// ```no_run
    /// # use piperci_client::ArtManClient;
    /// # use piperci_core::dto::artifact::NewArtifact;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ArtManClient::new("http://localhost:8090");
    /// let artifact = client.post_artifact(NewArtifact::new(
    ///     "task-1",
    ///     "minio://storage:9000/bucket/build.tar.gz",
    ///     "sha256-CXS0O7OjESVro+DicbpxpvZPeBy2jTJ/CuQJnScABWs=",
    ///     "builder",
    /// )).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post_artifact(&self, artifact: NewArtifact) -> Result<Artifact> {
        debug!("Creating new artifact record at {}", self.base_url);
        let url = endpoint(&self.base_url, &["artifact"])?;
        let response = self.client.post(url).json(&artifact).send().await?;

        handle_response(response).await
    }

    // =============================================================================
    // Artifact Query
    // =============================================================================

    /// Check whether any artifact is registered for the SRI or task
    ///
    /// `200` means yes and `404` means no; any other status is an error.
    pub async fn artifact_exists(&self, lookup: &ExistsLookup) -> Result<bool> {
        let url = match lookup {
            ExistsLookup::BySri(sri) => {
                endpoint(&self.base_url, &["artifact", "sri", sri.as_str()])?
            }
            ExistsLookup::ByTaskId(task_id) => {
                endpoint(&self.base_url, &["artifact", "task", task_id.as_str()])?
            }
        };

        debug!("Checking if artifact record exists for {:?}", lookup);
        let response = self.client.head(url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::remote(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            )),
        }
    }

    /// Read an artifact's status from the `x-gman-artifact-status` header
    pub async fn artifact_status(&self, artifact_id: &str) -> Result<String> {
        debug!("Checking artifact status for artifact_id {}", artifact_id);
        let url = endpoint(&self.base_url, &["artifact", artifact_id])?;
        let response = check_status(self.client.head(url).send().await?).await?;

        header_str(&response, ARTIFACT_STATUS_HEADER).map(str::to_string)
    }

    /// Fetch artifact records for a lookup key
    ///
    /// An artifact id yields at most one record. A thread id is resolved to
    /// its tasks through GMan and their artifacts are concatenated in task
    /// order. `filter` applies to the final list in every case.
    pub async fn get_artifacts(
        &self,
        lookup: &ArtifactLookup,
        filter: Option<Filter<'_, Artifact>>,
    ) -> Result<Vec<Artifact>> {
        match lookup {
            ArtifactLookup::BySri(sri) => {
                debug!("Getting artifact records for SRI {}", sri);
                self.get_list(&["artifact", "sri", sri.as_str()], filter).await
            }
            ArtifactLookup::ByTaskId(task_id) => {
                debug!("Getting artifact records for task_id {}", task_id);
                self.get_list(&["artifact", "task", task_id.as_str()], filter).await
            }
            ArtifactLookup::ByArtifactId(artifact_id) => {
                let artifact = self.get_artifact(artifact_id).await?;
                Ok(apply_filter(vec![artifact], filter))
            }
            ArtifactLookup::ByThreadId(thread_id) => {
                debug!("Getting artifact records for thread_id {}", thread_id);
                let tasks = self.gman.get_thread_tasks(thread_id, None).await?;

                let mut artifacts = Vec::new();
                for task in tasks {
                    artifacts.extend(
                        self.get_list(&["artifact", "task", task.task_id.as_str()], None)
                            .await?,
                    );
                }
                Ok(apply_filter(artifacts, filter))
            }
        }
    }

    /// Fetch a single artifact record
    pub async fn get_artifact(&self, artifact_id: &str) -> Result<Artifact> {
        debug!("Getting artifact record for artifact_id {}", artifact_id);
        let url = endpoint(&self.base_url, &["artifact", artifact_id])?;
        let response = self.client.get(url).send().await?;

        handle_response(response).await
    }

    async fn get_list(
        &self,
        segments: &[&str],
        filter: Option<Filter<'_, Artifact>>,
    ) -> Result<Vec<Artifact>> {
        let url = endpoint(&self.base_url, segments)?;
        let response = self.client.get(url).send().await?;

        handle_list_response(response, filter).await
    }
}
