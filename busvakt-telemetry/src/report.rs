//! Deterministic multi-line report rendering.
//!
//! Pure output-side effect onto the tracing sink. Rendering is total over
//! well-formed snapshots and alert sets; per-channel lines come out in the
//! snapshot's sorted order so reports diff cleanly across runs.

use tracing::{info, warn};

use busvakt_core::alert::Alert;
use busvakt_core::runtime::{PoolSpec, RuntimeSample};
use busvakt_core::snapshot::FlowSnapshot;

/// Renders a flow snapshot and its alerts.
pub fn flow_status(snapshot: &FlowSnapshot, alerts: &[Alert]) {
    info!("=== Message Flow Status ===");
    info!("Timestamp: {}", snapshot.timestamp.to_rfc3339());
    info!("Total Messages Sent: {}", snapshot.sent);
    info!("Total Messages Received: {}", snapshot.received);
    info!("Total Messages Pending: {}", snapshot.pending);
    info!("Total Messages Failed: {}", snapshot.failed);
    info!("Queue Backlog: {}", snapshot.backlog);
    info!("Processing Rate: {:.1}/sec", snapshot.rate);
    info!(
        "Tasks: started={}, completed={}, failed={}",
        snapshot.tasks_started, snapshot.tasks_completed, snapshot.tasks_failed
    );

    info!("--- Channel Statistics ---");
    for stats in &snapshot.per_channel {
        info!(
            "Channel '{}': sent={}, pending={}",
            stats.channel, stats.sent, stats.pending
        );
    }

    for alert in alerts {
        warn!("{}", alert.message);
    }

    info!("===========================");
}

/// Renders a runtime sample.
pub fn runtime_status(sample: &RuntimeSample) {
    info!("=== Runtime Metrics ===");
    info!("Worker Threads: {}", sample.worker_threads);
    info!("Worker CPU Time: {} ms", sample.worker_cpu_time_ns / 1_000_000);
    info!(
        "Memory Usage: {}/{} MB ({}%)",
        sample.used_memory_bytes / 1024 / 1024,
        sample.max_memory_bytes / 1024 / 1024,
        memory_percent(sample)
    );
    info!("Local Consumers: {}", sample.local_consumers);
    info!("Remote Consumers: {}", sample.remote_consumers);

    if sample.local_consumers == 0 {
        warn!("No local consumers registered");
    }

    info!("=======================");
}

/// Renders the on-demand detailed dump: latest sample plus the static pool
/// descriptors from configuration.
pub fn detailed(sample: Option<&RuntimeSample>, pools: &[PoolSpec]) {
    info!("=== Detailed Runtime Metrics ===");
    info!("Available processors: {}", num_cpus::get());

    for pool in pools {
        info!("Worker pool '{}': size={}", pool.name, pool.size);
    }

    match sample {
        Some(sample) => {
            info!("Worker Threads: {}", sample.worker_threads);
            info!("Worker CPU Time: {} ms", sample.worker_cpu_time_ns / 1_000_000);
            info!(
                "Memory Usage: {}/{} MB",
                sample.used_memory_bytes / 1024 / 1024,
                sample.max_memory_bytes / 1024 / 1024
            );
        }
        None => info!("No runtime sample available"),
    }

    info!("================================");
}

/// Guarded percentage; a zero memory ceiling renders as 0%.
fn memory_percent(sample: &RuntimeSample) -> u64 {
    if sample.max_memory_bytes == 0 {
        0
    } else {
        sample.used_memory_bytes * 100 / sample.max_memory_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busvakt_core::alert::{evaluate, Thresholds};
    use busvakt_core::flow::FlowRegistry;
    use tracing_test::traced_test;

    fn sample() -> RuntimeSample {
        RuntimeSample {
            worker_threads: 3,
            worker_cpu_time_ns: 42_000_000,
            used_memory_bytes: 64 << 20,
            total_memory_bytes: 512 << 20,
            max_memory_bytes: 256 << 20,
            local_consumers: 0,
            remote_consumers: 0,
        }
    }

    #[traced_test]
    #[test]
    fn flow_report_contains_counters_and_alerts() {
        let registry = FlowRegistry::new();
        for _ in 0..120 {
            registry.record_sent("x");
        }
        for _ in 0..10 {
            registry.record_received("x");
        }

        let snapshot = FlowSnapshot::build(registry.counters(), 1000);
        let alerts = evaluate(&snapshot, &Thresholds::default());
        flow_status(&snapshot, &alerts);

        assert!(logs_contain("Total Messages Sent: 120"));
        assert!(logs_contain("Queue Backlog: 110"));
        assert!(logs_contain("Channel 'x': sent=120, pending=110"));
        assert!(logs_contain("High queue backlog detected: 110 messages"));
        assert!(logs_contain("High pending messages: 110 messages"));
    }

    #[traced_test]
    #[test]
    fn runtime_report_warns_on_missing_consumers() {
        runtime_status(&sample());
        assert!(logs_contain("Worker Threads: 3"));
        assert!(logs_contain("Memory Usage: 64/256 MB (25%)"));
        assert!(logs_contain("No local consumers registered"));
    }

    #[traced_test]
    #[test]
    fn detailed_report_lists_pools_without_a_sample() {
        let pools = vec![PoolSpec {
            name: "custom-pool".into(),
            size: 8,
        }];
        detailed(None, &pools);
        assert!(logs_contain("Worker pool 'custom-pool': size=8"));
        assert!(logs_contain("No runtime sample available"));
    }

    #[test]
    fn memory_percent_guards_zero_ceiling() {
        let mut sample = sample();
        sample.max_memory_bytes = 0;
        assert_eq!(memory_percent(&sample), 0);
    }
}
