//! PiperCI HTTP Clients
//!
//! Thin, typed clients for the two PiperCI backend services:
//! - [`GManClient`]: the task/event ledger (tasks, events, threads)
//! - [`ArtManClient`]: the artifact registry
//!
//! Every call issues exactly one request except the `wait_*` helpers, which
//! poll with a bounded [`RetryPolicy`] until the remote state is terminal.
//!
//! # Example
//!
//! ```no_run
//! use piperci_client::GManClient;
//! use piperci_core::domain::task::TaskStatus;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gman = GManClient::new("http://localhost:8089");
//!
//!     gman.wait_for_task_status("1234", TaskStatus::Completed, 10).await?;
//!     Ok(())
//! }
//! ```

mod artman;
pub mod error;
mod gman;
mod lookup;
pub mod polling;
mod response;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use artman::{ARTIFACT_STATUS_HEADER, ArtManClient};
pub use error::{ClientError, Result};
pub use gman::{GManClient, THREAD_STATUS_HEADERS};
pub use lookup::{ArtifactLookup, ExistsLookup};
pub use polling::{Backoff, DEFAULT_MAX_ATTEMPTS, PollOutcome, Poller, RetryPolicy, Sleeper, TokioSleeper};

/// Element-wise predicate applied to JSON list responses
///
/// Elements for which it returns `false` are dropped; order is preserved.
pub type Filter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);
