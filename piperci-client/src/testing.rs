//! Test helpers: an in-process HTTP server and a sleeper that never sleeps

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use crate::polling::{Backoff, Poller, RetryPolicy, Sleeper};

/// Records requested delays instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Poller that records its sleeps in `sleeper`
pub fn instant_poller(sleeper: &Arc<RecordingSleeper>) -> Poller {
    Poller::with_sleeper(
        RetryPolicy::new(10, Backoff::default()),
        sleeper.clone(),
    )
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
