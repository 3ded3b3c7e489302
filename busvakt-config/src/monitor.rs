//! Monitoring intervals, alert thresholds, and worker pool descriptors.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Message-flow monitor parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct FlowMonitorConfig {
    /// Reporting interval in milliseconds. The monitor fires on this
    /// interval regardless of message volume.
    #[validate(range(min = 100, max = 3_600_000))]
    #[serde(default = "default_flow_interval_ms")]
    pub interval_ms: u64,

    /// Warning thresholds applied to each snapshot.
    #[validate(nested)]
    pub thresholds: ThresholdConfig,
}

fn default_flow_interval_ms() -> u64 {
    3000
}

impl Default for FlowMonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_flow_interval_ms(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

/// Alert thresholds. Boundary values do not fire; only strict excess does.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ThresholdConfig {
    /// Queue backlog (sent minus received) above which a warning is raised.
    #[validate(range(min = 1))]
    #[serde(default = "default_backlog_warn")]
    pub backlog_warn: i64,

    /// In-flight message count above which a warning is raised.
    #[validate(range(min = 1))]
    #[serde(default = "default_pending_warn")]
    pub pending_warn: i64,
}

fn default_backlog_warn() -> i64 {
    100
}
fn default_pending_warn() -> i64 {
    50
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            backlog_warn: default_backlog_warn(),
            pending_warn: default_pending_warn(),
        }
    }
}

/// Runtime monitor parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RuntimeMonitorConfig {
    /// Sampling interval in milliseconds.
    #[validate(range(min = 100, max = 3_600_000))]
    #[serde(default = "default_runtime_interval_ms")]
    pub interval_ms: u64,

    /// Substring matched against thread names to classify worker threads.
    /// Best effort: follows the dispatch collaborator's naming convention.
    #[validate(custom(function = validation::validate_thread_pattern))]
    #[serde(default = "default_thread_pattern")]
    pub thread_pattern: String,

    /// Static worker pool descriptors, reported in the detailed dump.
    #[validate(custom(function = validation::validate_pools))]
    #[serde(default = "default_pools")]
    pub pools: Vec<WorkerPoolConfig>,
}

fn default_runtime_interval_ms() -> u64 {
    5000
}

fn default_thread_pattern() -> String {
    "worker-pool".into()
}

fn default_pools() -> Vec<WorkerPoolConfig> {
    vec![WorkerPoolConfig {
        name: "worker-pool".into(),
        size: 3,
    }]
}

impl Default for RuntimeMonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_runtime_interval_ms(),
            thread_pattern: default_thread_pattern(),
            pools: default_pools(),
        }
    }
}

/// One named worker pool owned by the dispatch collaborator.
/// Validated as a set by `validation::validate_pools`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    pub name: String,
    pub size: usize,
}
