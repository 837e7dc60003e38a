//! Bounded polling
//!
//! A [`Poller`] repeatedly runs a probe until it reports a terminal outcome
//! or the attempt budget runs out. Each wait call drives one resource to a
//! terminal state before returning; nothing is polled concurrently.
//!
//! ```text
//!            probe
//! Pending ──────────┬─> Satisfied   (Ok)
//!    ^              ├─> Failed      (ClientError::TaskFailed)
//!    └── sleep ─────┘
//!        after max_attempts probes ─> TimedOut (ClientError::Timeout)
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Attempt budget used when the caller has no opinion
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// Terminal success
    Satisfied(T),
    /// Not there yet, try again
    Pending,
    /// Terminal failure reported by the remote side
    Failed(String),
}

/// Delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay every time
    Constant(Duration),
    /// Doubling delay starting at `initial`, capped at `max`
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay to apply after the `attempt`-th unsuccessful probe (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Constant(delay) => delay,
            Backoff::Exponential { initial, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Constant(Duration::from_secs(1))
    }
}

/// How many times to probe and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::default())
    }
}

/// Suspends the polling loop between attempts
///
/// Swapped out in tests so no real time passes.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs probes under a [`RetryPolicy`]
#[derive(Clone)]
pub struct Poller {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for Poller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller").field("policy", &self.policy).finish()
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl Poller {
    /// Create a poller that sleeps on the tokio timer
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(TokioSleeper))
    }

    /// Create a poller with a custom sleeper
    pub fn with_sleeper(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Same backoff and sleeper with a different attempt budget
    pub fn with_max_attempts(&self, max_attempts: u32) -> Self {
        Self {
            policy: RetryPolicy {
                max_attempts,
                ..self.policy
            },
            sleeper: Arc::clone(&self.sleeper),
        }
    }

    /// Probe until satisfied, failed, or out of attempts
    ///
    /// Errors returned by the probe itself (transport or remote errors) end
    /// the loop immediately; only [`PollOutcome::Pending`] is retried. No
    /// sleep follows the final attempt.
    ///
    /// # Arguments
    /// * `what` - Description of the awaited resource, used in the timeout error
    /// * `probe` - Fetches the current state once per attempt
    pub async fn poll<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollOutcome<T>>>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        while attempt < max_attempts {
            attempt += 1;
            debug!("Polling {} (attempt {}/{})", what, attempt, max_attempts);

            match probe().await? {
                PollOutcome::Satisfied(value) => return Ok(value),
                PollOutcome::Failed(reason) => return Err(ClientError::TaskFailed(reason)),
                PollOutcome::Pending if attempt < max_attempts => {
                    self.sleeper.sleep(self.policy.backoff.delay(attempt)).await;
                }
                PollOutcome::Pending => {}
            }
        }

        Err(ClientError::Timeout {
            what: what.to_string(),
            attempts: max_attempts,
        })
    }
}
