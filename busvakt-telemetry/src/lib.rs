//! # Busvakt Telemetry
//!
//! Logging initialization, report rendering, and the in-process Prometheus
//! mirror of the flow counters.

pub mod logging;
pub mod metrics;
pub mod report;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
