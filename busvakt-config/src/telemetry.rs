//! Observability configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Mirror flow snapshots into the in-process Prometheus registry.
    #[serde(default = "default_true")]
    pub prometheus: bool,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            prometheus: true,
            log_filter: default_log_filter(),
        }
    }
}
