//! PiperCI command-line tools
//!
//! Two binaries share this library:
//! - `sritool`: generate, verify and decode SRI strings
//! - `piperci`: operator access to GMan, ArtMan and the object store

pub mod commands;
pub mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for `piperci`; covers every `piperci_*` library crate
pub const PIPERCI_LOG_DIRECTIVE: &str = "piperci=info";

/// Default filter for `sritool`
pub const SRITOOL_LOG_DIRECTIVE: &str = "sritool=info,piperci=info";

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout carries only command output. `RUST_LOG`
/// overrides `default_directive`.
pub fn init_logging(default_directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    fn check(directive: &str, checks: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(EnvFilter::new(directive));
        tracing::subscriber::with_default(subscriber, checks);
    }

    #[test]
    fn test_piperci_default_shows_library_info() {
        check(PIPERCI_LOG_DIRECTIVE, || {
            assert!(tracing::enabled!(target: "piperci_storage", Level::INFO));
            assert!(tracing::enabled!(target: "piperci_client::gman::threads", Level::INFO));
            assert!(!tracing::enabled!(target: "piperci_client", Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper_util::client", Level::INFO));
        });
    }

    #[test]
    fn test_sritool_default_shows_info() {
        check(SRITOOL_LOG_DIRECTIVE, || {
            assert!(tracing::enabled!(target: "sritool", Level::INFO));
            assert!(tracing::enabled!(target: "piperci_sri::sri", Level::INFO));
            assert!(!tracing::enabled!(target: "piperci_sri::sri", Level::DEBUG));
        });
    }
}
