//! Monitor runtime - owns the counter registry, both monitor pipelines,
//! and their schedulers.
//!
//! An explicit object threaded through whichever component starts the
//! monitored subsystem: created once, live for the process, never reset.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use busvakt_config::BusvaktConfig;
use busvakt_core::flow::FlowRegistry;
use busvakt_core::runtime::{ProcIntrospect, RuntimeIntrospect, RuntimeSampler};
use busvakt_telemetry::MetricsRecorder;

use crate::engine::monitor::{FlowMonitor, RuntimeMonitor};
use crate::engine::scheduler::{PeriodicScheduler, SchedulerHandle};

pub struct MonitorRuntime {
    registry: Arc<FlowRegistry>,
    sampler: Arc<RuntimeSampler>,
    flow: Arc<FlowMonitor>,
    runtime: Arc<RuntimeMonitor>,
    metrics: Arc<MetricsRecorder>,
    schedulers: Mutex<Vec<SchedulerHandle>>,
}

impl MonitorRuntime {
    /// Runtime backed by `/proc` introspection of this process.
    pub fn new(config: &BusvaktConfig) -> Self {
        Self::with_introspect(config, Arc::new(ProcIntrospect))
    }

    pub fn with_introspect(
        config: &BusvaktConfig,
        introspect: Arc<dyn RuntimeIntrospect>,
    ) -> Self {
        info!("Initializing monitor runtime");
        debug!("Flow config: {:?}", config.flow);
        debug!("Runtime config: {:?}", config.runtime);

        let registry = Arc::new(FlowRegistry::new());
        let metrics = Arc::new(MetricsRecorder::new());
        let sampler = Arc::new(RuntimeSampler::with_introspect(
            config.runtime.thread_pattern.clone(),
            introspect,
        ));

        let flow = Arc::new(FlowMonitor::new(
            registry.clone(),
            &config.flow,
            metrics.clone(),
        ));
        let runtime = Arc::new(RuntimeMonitor::new(sampler.clone(), &config.runtime));

        Self {
            registry,
            sampler,
            flow,
            runtime,
            metrics,
            schedulers: Mutex::new(Vec::new()),
        }
    }

    // Lifecycle events from the delivery and dispatch collaborators. Called
    // on their threads; constant-time atomic updates only.

    pub fn on_sent(&self, channel: &str) {
        self.registry.record_sent(channel);
    }

    pub fn on_received(&self, channel: &str) {
        self.registry.record_received(channel);
    }

    pub fn on_failed(&self, channel: &str) {
        self.registry.record_failed(channel);
    }

    pub fn task_started(&self) {
        self.registry.task_started();
    }

    pub fn task_completed(&self) {
        self.registry.task_completed();
    }

    pub fn task_failed(&self) {
        self.registry.task_failed();
    }

    pub fn register_local_consumer(&self) {
        self.sampler.register_local_consumer();
    }

    pub fn deregister_local_consumer(&self) {
        self.sampler.deregister_local_consumer();
    }

    pub fn register_remote_consumer(&self) {
        self.sampler.register_remote_consumer();
    }

    pub fn deregister_remote_consumer(&self) {
        self.sampler.deregister_remote_consumer();
    }

    pub fn registry(&self) -> &Arc<FlowRegistry> {
        &self.registry
    }

    pub fn flow(&self) -> &FlowMonitor {
        &self.flow
    }

    pub fn runtime_monitor(&self) -> &RuntimeMonitor {
        &self.runtime
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Spawns both report schedulers. Must be called inside a tokio runtime.
    /// Idempotent: a second call while running is a no-op.
    pub fn start(&self) {
        let mut schedulers = self.schedulers.lock();
        if !schedulers.is_empty() {
            debug!("Monitor schedulers already running");
            return;
        }

        let flow = self.flow.clone();
        schedulers.push(PeriodicScheduler::spawn(
            "message-flow",
            Duration::from_millis(flow.interval_ms()),
            move || {
                flow.tick();
                Ok(())
            },
        ));

        let runtime = self.runtime.clone();
        schedulers.push(PeriodicScheduler::spawn(
            "runtime-health",
            Duration::from_millis(runtime.interval_ms()),
            move || runtime.tick(),
        ));

        info!("Monitor schedulers started");
    }

    /// Stop-and-drain both schedulers. In-flight report cycles complete;
    /// counters stay intact and can keep accumulating.
    pub async fn shutdown(&self) {
        let handles: Vec<SchedulerHandle> = {
            let mut schedulers = self.schedulers.lock();
            schedulers.drain(..).collect()
        };

        for handle in handles {
            handle.stop().await;
        }
        info!("Monitor schedulers stopped");
    }

    /// Operator-triggered diagnostics dump.
    pub fn detailed_report(&self) {
        self.runtime.detailed_report();
    }
}
