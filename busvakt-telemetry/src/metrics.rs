//! In-process Prometheus mirror of the flow counters.
//!
//! The registry is never served over the network; `gather_metrics` renders
//! the text exposition format for embedding into whatever observability
//! surface the collaborator runs.

use prometheus::{Gauge, IntGauge, Registry};

use busvakt_core::snapshot::FlowSnapshot;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    messages_sent: IntGauge,
    messages_received: IntGauge,
    messages_pending: IntGauge,
    messages_failed: IntGauge,
    queue_backlog: IntGauge,
    processing_rate: Gauge,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();

        let messages_sent =
            IntGauge::new("busvakt_messages_sent", "Cumulative messages sent").unwrap();
        let messages_received =
            IntGauge::new("busvakt_messages_received", "Cumulative messages received").unwrap();
        let messages_pending =
            IntGauge::new("busvakt_messages_pending", "In-flight message count").unwrap();
        let messages_failed =
            IntGauge::new("busvakt_messages_failed", "Cumulative failed messages").unwrap();
        let queue_backlog =
            IntGauge::new("busvakt_queue_backlog", "Sent minus received").unwrap();
        let processing_rate =
            Gauge::new("busvakt_processing_rate", "Received per second of interval").unwrap();

        registry.register(Box::new(messages_sent.clone())).unwrap();
        registry
            .register(Box::new(messages_received.clone()))
            .unwrap();
        registry
            .register(Box::new(messages_pending.clone()))
            .unwrap();
        registry
            .register(Box::new(messages_failed.clone()))
            .unwrap();
        registry.register(Box::new(queue_backlog.clone())).unwrap();
        registry
            .register(Box::new(processing_rate.clone()))
            .unwrap();

        Self {
            registry,
            messages_sent,
            messages_received,
            messages_pending,
            messages_failed,
            queue_backlog,
            processing_rate,
        }
    }

    /// Copies one flow snapshot into the gauges.
    pub fn observe_flow(&self, snapshot: &FlowSnapshot) {
        self.messages_sent.set(snapshot.sent as i64);
        self.messages_received.set(snapshot.received as i64);
        self.messages_pending.set(snapshot.pending);
        self.messages_failed.set(snapshot.failed as i64);
        self.queue_backlog.set(snapshot.backlog);
        self.processing_rate.set(snapshot.rate);
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busvakt_core::flow::FlowRegistry;

    #[test]
    fn mirrors_a_snapshot_into_the_registry() {
        let registry = FlowRegistry::new();
        for _ in 0..5 {
            registry.record_sent("demo");
        }
        registry.record_received("demo");

        let recorder = MetricsRecorder::new();
        recorder.observe_flow(&FlowSnapshot::build(registry.counters(), 1000));

        let rendered = recorder.gather_metrics().unwrap();
        assert!(rendered.contains("busvakt_messages_sent 5"));
        assert!(rendered.contains("busvakt_queue_backlog 4"));
    }

    #[test]
    fn repeated_observation_overwrites_rather_than_accumulates() {
        let registry = FlowRegistry::new();
        registry.record_sent("demo");

        let recorder = MetricsRecorder::new();
        let snapshot = FlowSnapshot::build(registry.counters(), 1000);
        recorder.observe_flow(&snapshot);
        recorder.observe_flow(&snapshot);

        let rendered = recorder.gather_metrics().unwrap();
        assert!(rendered.contains("busvakt_messages_sent 1"));
    }
}
