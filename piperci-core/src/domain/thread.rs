//! Thread domain types
//!
//! A thread aggregates every task spawned for one unit of pipeline work.

use serde::{Deserialize, Serialize};

/// Server-side task counts for a thread
///
/// GMan reports these as `x-gman-tasks-*` response headers on `HEAD /thread/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadStatus {
    pub running: u64,
    pub completed: u64,
    pub pending: u64,
    pub failed: u64,
}

impl ThreadStatus {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Nothing left in flight and at least one task finished
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.running == 0 && self.pending == 0 && self.completed > 0
    }
}

impl std::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "running={} completed={} pending={} failed={}",
            self.running, self.completed, self.pending, self.failed
        )
    }
}
