//! Task DTOs sent to GMan

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskStatus;

/// Request for a new task id
///
/// `status` must be `started` for callers that originate work, or `received`
/// for executors picking up a delegated task (which then also need the
/// `thread_id` and `parent_id` of the delegating task).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub run_id: String,
    pub project: String,
    pub caller: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Body of `POST /task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(flatten)]
    pub task: NewTask,
    pub message: String,
}

impl From<NewTask> for CreateTaskRequest {
    fn from(task: NewTask) -> Self {
        Self {
            task,
            message: "Requesting new taskID".to_string(),
        }
    }
}

/// Body of `PUT /task/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: TaskStatus,
    pub message: String,
}
