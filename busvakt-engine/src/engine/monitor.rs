//! The two monitor pipelines: message flow and runtime health.
//!
//! One parameterizable shape, instantiated per monitored subsystem with its
//! own interval and payload.

use std::sync::Arc;

use parking_lot::Mutex;

use busvakt_config::{FlowMonitorConfig, RuntimeMonitorConfig};
use busvakt_core::alert::{evaluate, Alert, Thresholds};
use busvakt_core::flow::FlowRegistry;
use busvakt_core::runtime::{PoolSpec, RuntimeSample, RuntimeSampler};
use busvakt_core::snapshot::FlowSnapshot;
use busvakt_core::SampleError;
use busvakt_telemetry::{report, MetricsRecorder};

/// Message-flow monitor: reads the registry, derives backlog/rate,
/// evaluates thresholds, reports.
pub struct FlowMonitor {
    registry: Arc<FlowRegistry>,
    thresholds: Thresholds,
    interval_ms: u64,
    metrics: Arc<MetricsRecorder>,
}

impl FlowMonitor {
    pub fn new(
        registry: Arc<FlowRegistry>,
        config: &FlowMonitorConfig,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            registry,
            thresholds: Thresholds {
                backlog_warn: config.thresholds.backlog_warn,
                pending_warn: config.thresholds.pending_warn,
            },
            interval_ms: config.interval_ms,
            metrics,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Pull-style query for embedding into other observability surfaces.
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot::build(self.registry.counters(), self.interval_ms)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        evaluate(&self.snapshot(), &self.thresholds)
    }

    /// One report cycle. Infallible: counter reads and rendering are total.
    pub fn tick(&self) {
        let snapshot = self.snapshot();
        let alerts = evaluate(&snapshot, &self.thresholds);
        self.metrics.observe_flow(&snapshot);
        report::flow_status(&snapshot, &alerts);
    }
}

/// Runtime monitor: samples host thread/memory state and reports it.
pub struct RuntimeMonitor {
    sampler: Arc<RuntimeSampler>,
    pools: Vec<PoolSpec>,
    interval_ms: u64,
    last_sample: Mutex<Option<RuntimeSample>>,
}

impl RuntimeMonitor {
    pub fn new(sampler: Arc<RuntimeSampler>, config: &RuntimeMonitorConfig) -> Self {
        let pools = config
            .pools
            .iter()
            .map(|pool| PoolSpec {
                name: pool.name.clone(),
                size: pool.size,
            })
            .collect();

        Self {
            sampler,
            pools,
            interval_ms: config.interval_ms,
            last_sample: Mutex::new(None),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// One report cycle. A sampling failure aborts the cycle for this tick;
    /// the caller logs it and retries on the next tick.
    pub fn tick(&self) -> Result<(), SampleError> {
        let sample = self.sampler.sample()?;
        report::runtime_status(&sample);
        *self.last_sample.lock() = Some(sample);
        Ok(())
    }

    pub fn last_sample(&self) -> Option<RuntimeSample> {
        self.last_sample.lock().clone()
    }

    /// On-demand diagnostics: the latest sample (taking a fresh one if none
    /// has been recorded yet) plus the static pool descriptors.
    pub fn detailed_report(&self) {
        let latest = self.last_sample().or_else(|| self.sampler.sample().ok());
        report::detailed(latest.as_ref(), &self.pools);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busvakt_core::alert::AlertKind;
    use busvakt_core::runtime::{MemoryFigures, RuntimeIntrospect, ThreadInfo};

    struct FakeIntrospect;

    impl RuntimeIntrospect for FakeIntrospect {
        fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError> {
            Ok(vec![ThreadInfo {
                id: 1,
                name: "worker-pool-thread-0".into(),
                cpu_time_ns: 1_000,
            }])
        }

        fn memory(&self) -> Result<MemoryFigures, SampleError> {
            Ok(MemoryFigures {
                used_bytes: 1 << 20,
                total_bytes: 8 << 20,
                max_bytes: 8 << 20,
            })
        }
    }

    /// Fails the first sample, then recovers.
    struct FlakyIntrospect {
        failed_once: Mutex<bool>,
    }

    impl RuntimeIntrospect for FlakyIntrospect {
        fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError> {
            let mut failed = self.failed_once.lock();
            if !*failed {
                *failed = true;
                return Err(SampleError::Unavailable("first call fails".into()));
            }
            Ok(vec![])
        }

        fn memory(&self) -> Result<MemoryFigures, SampleError> {
            Ok(MemoryFigures {
                used_bytes: 0,
                total_bytes: 0,
                max_bytes: 0,
            })
        }
    }

    #[test]
    fn flow_monitor_raises_both_alerts_on_heavy_backlog() {
        let registry = Arc::new(FlowRegistry::new());
        for _ in 0..120 {
            registry.record_sent("x");
        }
        for _ in 0..10 {
            registry.record_received("x");
        }

        let monitor = FlowMonitor::new(
            registry,
            &FlowMonitorConfig::default(),
            Arc::new(MetricsRecorder::new()),
        );

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.backlog, 110);
        assert_eq!(snapshot.pending, 110);

        let kinds: Vec<AlertKind> = monitor.alerts().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::HighBacklog, AlertKind::HighPending]);
    }

    #[test]
    fn runtime_monitor_recovers_after_a_failed_sample() {
        let sampler = Arc::new(RuntimeSampler::with_introspect(
            "worker",
            Arc::new(FlakyIntrospect {
                failed_once: Mutex::new(false),
            }),
        ));
        let monitor = RuntimeMonitor::new(sampler, &RuntimeMonitorConfig::default());

        assert!(monitor.tick().is_err());
        assert!(monitor.last_sample().is_none());

        assert!(monitor.tick().is_ok());
        assert!(monitor.last_sample().is_some());
    }

    #[test]
    fn runtime_monitor_keeps_the_latest_sample() {
        let sampler = Arc::new(RuntimeSampler::with_introspect(
            "worker-pool",
            Arc::new(FakeIntrospect),
        ));
        let monitor = RuntimeMonitor::new(sampler, &RuntimeMonitorConfig::default());

        monitor.tick().unwrap();
        let sample = monitor.last_sample().unwrap();
        assert_eq!(sample.worker_threads, 1);
        assert_eq!(sample.used_memory_bytes, 1 << 20);
    }
}
