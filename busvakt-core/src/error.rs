use thiserror::Error;

/// Failures surfaced by runtime introspection.
///
/// A sampling failure is never fatal: the owning scheduler logs a degraded
/// cycle, keeps counters intact, and retries on the next tick.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Runtime introspection unavailable: {0}")]
    Unavailable(String),

    #[error("Runtime introspection unsupported: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
