//! Task domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work tracked by GMan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub run_id: String,
    pub project: String,
    pub caller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Status carried by a task event
///
/// The current status of a task is whatever the server derives from its
/// latest event; the client never recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Started,
    Received,
    Running,
    Completed,
    Failed,
    Info,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Started => "started",
            TaskStatus::Received => "received",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Info => "info",
            TaskStatus::Unknown => "unknown",
        }
    }

    /// Statuses a brand new task may be created with
    pub fn is_initial(&self) -> bool {
        matches!(self, TaskStatus::Started | TaskStatus::Received)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "started" => Ok(TaskStatus::Started),
            "received" => Ok(TaskStatus::Received),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            "info" => Ok(TaskStatus::Info),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// Immutable event appended to a task's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub task: Task,
    pub status: TaskStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}
