//! Thread endpoints

use piperci_core::domain::task::{Task, TaskEvent};
use piperci_core::domain::thread::ThreadStatus;
use tracing::{debug, info};

use crate::GManClient;
use crate::Filter;
use crate::error::Result;
use crate::polling::PollOutcome;
use crate::response::{check_status, endpoint, handle_list_response, header_count};

/// Headers carrying the running, completed, pending and failed counts
pub const THREAD_STATUS_HEADERS: [&str; 4] = [
    "x-gman-tasks-running",
    "x-gman-tasks-completed",
    "x-gman-tasks-pending",
    "x-gman-tasks-failed",
];

impl GManClient {
    // =============================================================================
    // Thread Query
    // =============================================================================

    /// List the tasks that belong to a thread
    pub async fn get_thread_tasks(
        &self,
        thread_id: &str,
        filter: Option<Filter<'_, Task>>,
    ) -> Result<Vec<Task>> {
        let url = endpoint(&self.base_url, &["thread", thread_id])?;
        let response = self.client.get(url).send().await?;

        handle_list_response(response, filter).await
    }

    /// List the events of every task in a thread
    pub async fn get_thread_events(
        &self,
        thread_id: &str,
        filter: Option<Filter<'_, TaskEvent>>,
    ) -> Result<Vec<TaskEvent>> {
        let url = endpoint(&self.base_url, &["thread", thread_id, "events"])?;
        let response = self.client.get(url).send().await?;

        handle_list_response(response, filter).await
    }

    /// Read a thread's aggregate task counts
    ///
    /// Issues a `HEAD` request; the counts arrive as response headers.
    pub async fn thread_status(&self, thread_id: &str) -> Result<ThreadStatus> {
        let url = endpoint(&self.base_url, &["thread", thread_id])?;
        let response = check_status(self.client.head(url).send().await?).await?;

        let [running, completed, pending, failed] = THREAD_STATUS_HEADERS;
        Ok(ThreadStatus {
            running: header_count(&response, running)?,
            completed: header_count(&response, completed)?,
            pending: header_count(&response, pending)?,
            failed: header_count(&response, failed)?,
        })
    }

    // =============================================================================
    // Polling
    // =============================================================================

    /// Wait until every task in a thread has completed
    ///
    /// Succeeds once nothing is running or pending and at least one task
    /// completed. Any failed task ends the wait with
    /// [`ClientError::TaskFailed`](crate::ClientError::TaskFailed).
    pub async fn wait_for_thread_complete(&self, thread_id: &str, max_attempts: u32) -> Result<()> {
        let what = format!("thread {} to complete", thread_id);

        self.poller
            .with_max_attempts(max_attempts)
            .poll(&what, move || async move {
                debug!("Checking status of thread {}", thread_id);
                let status = self.thread_status(thread_id).await?;
                Ok(classify_thread(thread_id, status))
            })
            .await?;

        info!("Thread {} completed", thread_id);
        Ok(())
    }
}

fn classify_thread(thread_id: &str, status: ThreadStatus) -> PollOutcome<()> {
    if status.has_failures() {
        PollOutcome::Failed(format!("Thread {} has failures ({})", thread_id, status))
    } else if status.is_complete() {
        PollOutcome::Satisfied(())
    } else {
        PollOutcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{RecordingSleeper, UNREACHABLE_URL, instant_poller, serve};
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::Json;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tasks() -> Value {
        json!([
            {
                "project": "python_project",
                "run_id": "574b1db2-ae55-41bb-8680-43703f3031f2",
                "caller": "gateway",
                "task_id": "1234",
                "thread_id": "1234"
            },
            {
                "project": "python_project",
                "run_id": "574b1db2-ae55-41bb-8680-43703f3031f2",
                "caller": "executor",
                "task_id": "1235",
                "thread_id": "1234"
            }
        ])
    }

    fn counts_headers(counts: [u64; 4]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, count) in THREAD_STATUS_HEADERS.iter().zip(counts) {
            headers.insert(*name, count.to_string().parse().unwrap());
        }
        headers
    }

    /// Serves `sequence[n]` as the counts for the n-th HEAD, repeating the last entry
    async fn status_server(sequence: Vec<[u64; 4]>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = (Arc::new(sequence), hits.clone());
        let router = Router::new()
            .route(
                "/thread/{id}",
                get(|| async { Json(tasks()) }).head(
                    |State((sequence, hits)): State<(Arc<Vec<[u64; 4]>>, Arc<AtomicUsize>)>| async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst);
                        let counts = sequence[n.min(sequence.len() - 1)];
                        counts_headers(counts)
                    },
                ),
            )
            .with_state(state);
        (serve(router).await, hits)
    }

    fn client(url: &str, sleeper: &Arc<RecordingSleeper>) -> GManClient {
        GManClient::new(url).with_poller(instant_poller(sleeper))
    }

    #[tokio::test]
    async fn test_get_thread_tasks() {
        let (url, _) = status_server(vec![[0, 0, 0, 0]]).await;
        let client = GManClient::new(&url);

        let all = client.get_thread_tasks("1234", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let executors = |t: &Task| t.caller == "executor";
        let one = client.get_thread_tasks("1234", Some(&executors)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].task_id, "1235");
    }

    #[tokio::test]
    async fn test_get_thread_events_filtered() {
        let router = Router::new().route(
            "/thread/{id}/events",
            get(|| async {
                Json(json!([
                    {"task": tasks()[0], "status": "completed", "message": "done"},
                    {"task": tasks()[1], "status": "running", "message": "busy"}
                ]))
            }),
        );
        let url = serve(router).await;

        let running = |e: &TaskEvent| e.message.as_deref() == Some("busy");
        let events = GManClient::new(&url)
            .get_thread_events("1234", Some(&running))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].task.task_id, "1235");
    }

    #[tokio::test]
    async fn test_get_thread_tasks_remote_error() {
        let router = Router::new().route("/thread/{id}", get(|| async { StatusCode::NOT_FOUND }));
        let url = serve(router).await;

        let err = GManClient::new(&url)
            .get_thread_tasks("1234", None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_thread_status_reads_headers() {
        let (url, _) = status_server(vec![[1, 2, 3, 0]]).await;

        let status = GManClient::new(&url).thread_status("1234").await.unwrap();
        assert_eq!(
            status,
            ThreadStatus {
                running: 1,
                completed: 2,
                pending: 3,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_thread_status_missing_header() {
        let router = Router::new().route("/thread/{id}", get(|| async { StatusCode::OK }));
        let url = serve(router).await;

        let err = GManClient::new(&url).thread_status("1234").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingHeader(name) if name == "x-gman-tasks-running"));
    }

    #[tokio::test]
    async fn test_wait_for_thread_complete_immediately() {
        let (url, hits) = status_server(vec![[0, 1, 0, 0]]).await;
        let sleeper = Arc::new(RecordingSleeper::default());

        client(&url, &sleeper)
            .wait_for_thread_complete("1234", 10)
            .await
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_for_thread_complete_after_pending() {
        let (url, hits) = status_server(vec![[1, 0, 1, 0], [1, 1, 0, 0], [0, 2, 0, 0]]).await;
        let sleeper = Arc::new(RecordingSleeper::default());

        client(&url, &sleeper)
            .wait_for_thread_complete("1234", 10)
            .await
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_wait_for_thread_complete_has_failures() {
        let (url, hits) = status_server(vec![[1, 1, 1, 1]]).await;
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = client(&url, &sleeper)
            .wait_for_thread_complete("1234", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::TaskFailed(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_for_thread_complete_times_out() {
        // nothing running, but nothing completed either
        let (url, hits) = status_server(vec![[0, 0, 0, 0]]).await;
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = client(&url, &sleeper)
            .wait_for_thread_complete("1234", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { attempts: 3, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_for_thread_complete_transport_error() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let err = client(UNREACHABLE_URL, &sleeper)
            .wait_for_thread_complete("1234", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
