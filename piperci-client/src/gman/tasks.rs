//! Task endpoints

use piperci_core::domain::task::{TaskEvent, TaskStatus};
use piperci_core::dto::task::{CreateTaskRequest, NewTask, UpdateTaskRequest};
use tracing::{debug, info};

use crate::GManClient;
use crate::error::{ClientError, Result};
use crate::polling::PollOutcome;
use crate::response::{endpoint, handle_list_response, handle_response};
use crate::Filter;

impl GManClient {
    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Request a new task id
    ///
    /// The request is validated before anything is sent: `status` must be
    /// `started` or `received`, and a `received` task must name both the
    /// thread and the parent task it was delegated from.
    ///
    /// # Returns
    /// The task's first event, as recorded by GMan
    ///
    /// # Example
    /// ```no_run
    /// # use piperci_client::GManClient;
    /// # use piperci_core::domain::task::TaskStatus;
    /// # use piperci_core::dto::task::NewTask;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GManClient::new("http://localhost:8089");
    /// let event = client.request_new_task(NewTask {
    ///     run_id: "run-1".to_string(),
    ///     project: "my-project".to_string(),
    ///     caller: "gateway".to_string(),
    ///     status: TaskStatus::Started,
    ///     thread_id: None,
    ///     parent_id: None,
    /// }).await?;
    /// println!("task id: {}", event.task.task_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request_new_task(&self, task: NewTask) -> Result<TaskEvent> {
        validate_new_task(&task)?;

        debug!("Requesting new taskID from gman at {}", self.base_url);
        let url = endpoint(&self.base_url, &["task"])?;
        let response = self
            .client
            .post(url)
            .json(&CreateTaskRequest::from(task))
            .send()
            .await?;

        handle_response(response).await
    }

    /// Append a status/message event to a task
    ///
    /// # Returns
    /// The recorded event
    pub async fn update_task(
        &self,
        task_id: &str,
        status: TaskStatus,
        message: impl Into<String>,
    ) -> Result<TaskEvent> {
        let url = endpoint(&self.base_url, &["task", task_id])?;
        let response = self
            .client
            .put(url)
            .json(&UpdateTaskRequest {
                status,
                message: message.into(),
            })
            .send()
            .await?;

        handle_response(response).await
    }

    /// List a task's events, optionally keeping only those accepted by `filter`
    ///
    /// # Example
    /// ```no_run
    /// # use piperci_client::GManClient;
    /// # use piperci_core::domain::task::{TaskEvent, TaskStatus};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GManClient::new("http://localhost:8089");
    /// let failed = |e: &TaskEvent| e.status == TaskStatus::Failed;
    /// let failures = client.get_task_events("1234", Some(&failed)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_task_events(
        &self,
        task_id: &str,
        filter: Option<Filter<'_, TaskEvent>>,
    ) -> Result<Vec<TaskEvent>> {
        let url = endpoint(&self.base_url, &["task", task_id, "events"])?;
        let response = self.client.get(url).send().await?;

        handle_list_response(response, filter).await
    }

    // =============================================================================
    // Polling
    // =============================================================================

    /// Wait until a task has an event with `status`
    ///
    /// Any `failed` event ends the wait with [`ClientError::TaskFailed`], even
    /// when an event with the awaited status is also present.
    ///
    /// # Arguments
    /// * `task_id` - The task to watch
    /// * `status` - The status to wait for
    /// * `max_attempts` - How many times to fetch the events before giving up
    pub async fn wait_for_task_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        max_attempts: u32,
    ) -> Result<()> {
        let what = format!("task {} to reach status {}", task_id, status);

        self.poller
            .with_max_attempts(max_attempts)
            .poll(&what, move || async move {
                debug!("Checking status of task {}", task_id);
                let events = self.get_task_events(task_id, None).await?;
                Ok(classify_task_events(task_id, &events, status))
            })
            .await?;

        info!("Task {} reached status {}", task_id, status);
        Ok(())
    }
}

fn validate_new_task(task: &NewTask) -> Result<()> {
    if !task.status.is_initial() {
        return Err(ClientError::InvalidArgument(format!(
            "Invalid status '{}'. Must be 'received' or 'started'.",
            task.status
        )));
    }

    let missing = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);
    if task.status == TaskStatus::Received && (missing(&task.thread_id) || missing(&task.parent_id))
    {
        return Err(ClientError::InvalidArgument(
            "thread_id and parent_id must be specified if status is received.".to_string(),
        ));
    }

    Ok(())
}

fn classify_task_events(task_id: &str, events: &[TaskEvent], status: TaskStatus) -> PollOutcome<()> {
    let failed = events
        .iter()
        .filter(|e| e.status == TaskStatus::Failed)
        .count();

    if failed > 0 {
        PollOutcome::Failed(format!("Task {} has {} failed task event(s)", task_id, failed))
    } else if events.iter().any(|e| e.status == status) {
        PollOutcome::Satisfied(())
    } else {
        PollOutcome::Pending
    }
}
