//! Structured logging setup with tracing.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber. `RUST_LOG` wins over the
    /// configured default filter.
    pub fn init() {
        Self::init_with_filter("info")
    }

    pub fn init_with_filter(default_filter: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_filter)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }
}
