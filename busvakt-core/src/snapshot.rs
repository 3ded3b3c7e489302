//! Immutable point-in-time flow snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::flow::{ChannelId, FlowCounters};

/// Per-channel slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub channel: ChannelId,
    pub sent: u64,
    pub pending: i64,
}

/// Point-in-time record of flow counters plus derived metrics.
///
/// `backlog` is computed once at build time and stored, so consumers reading
/// it from the same snapshot never see recomputation drift. `backlog`
/// ignores `failed` by convention; both figures are reported so the consumer
/// can reconcile.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub timestamp: DateTime<Utc>,
    pub sent: u64,
    pub received: u64,
    pub pending: i64,
    pub failed: u64,
    pub tasks_started: u64,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    /// `sent - received`; may go negative when failures drain pending.
    pub backlog: i64,
    /// Cumulative received per second of reporting interval; `0.0` when the
    /// interval is zero.
    pub rate: f64,
    /// Sorted lexicographically by channel id for deterministic reports.
    pub per_channel: Vec<ChannelStats>,
}

impl FlowSnapshot {
    /// Builds a snapshot from a counter read taken over `interval_ms`.
    pub fn build(counters: FlowCounters, interval_ms: u64) -> Self {
        let backlog = counters.sent as i64 - counters.received as i64;
        let rate = if interval_ms == 0 {
            0.0
        } else {
            counters.received as f64 / (interval_ms as f64 / 1000.0)
        };

        let mut per_channel = counters.per_channel;
        per_channel.sort_by(|a, b| a.channel.cmp(&b.channel));

        Self {
            timestamp: Utc::now(),
            sent: counters.sent,
            received: counters.received,
            pending: counters.pending,
            failed: counters.failed,
            tasks_started: counters.tasks_started,
            tasks_completed: counters.tasks_completed,
            tasks_failed: counters.tasks_failed,
            backlog,
            rate,
            per_channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowRegistry;

    #[test]
    fn backlog_is_sent_minus_received() {
        let registry = FlowRegistry::new();
        for _ in 0..12 {
            registry.record_sent("x");
        }
        for _ in 0..5 {
            registry.record_received("x");
        }

        let snapshot = FlowSnapshot::build(registry.counters(), 1000);
        assert_eq!(snapshot.backlog, 7);
    }

    #[test]
    fn rate_divides_by_interval_seconds() {
        let registry = FlowRegistry::new();
        for _ in 0..10 {
            registry.record_sent("x");
            registry.record_received("x");
        }
        let snapshot = FlowSnapshot::build(registry.counters(), 1000);
        assert_eq!(snapshot.rate, 10.0);

        let registry = FlowRegistry::new();
        for _ in 0..25 {
            registry.record_sent("x");
            registry.record_received("x");
        }
        let snapshot = FlowSnapshot::build(registry.counters(), 5000);
        assert_eq!(snapshot.rate, 5.0);
    }

    #[test]
    fn zero_interval_forces_zero_rate() {
        let registry = FlowRegistry::new();
        registry.record_sent("x");
        registry.record_received("x");

        let snapshot = FlowSnapshot::build(registry.counters(), 0);
        assert_eq!(snapshot.rate, 0.0);
    }

    #[test]
    fn per_channel_is_sorted_by_id() {
        let registry = FlowRegistry::new();
        registry.record_sent("zeta");
        registry.record_sent("alpha");
        registry.record_sent("mid");

        let snapshot = FlowSnapshot::build(registry.counters(), 1000);
        let ids: Vec<&str> = snapshot
            .per_channel
            .iter()
            .map(|c| c.channel.as_str())
            .collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn snapshot_is_idempotent_without_mutation() {
        let registry = FlowRegistry::new();
        for _ in 0..3 {
            registry.record_sent("a");
        }
        registry.record_received("a");

        let first = FlowSnapshot::build(registry.counters(), 2000);
        let second = FlowSnapshot::build(registry.counters(), 2000);

        assert_eq!(first.sent, second.sent);
        assert_eq!(first.received, second.received);
        assert_eq!(first.pending, second.pending);
        assert_eq!(first.failed, second.failed);
        assert_eq!(first.backlog, second.backlog);
        assert_eq!(first.rate, second.rate);
        assert_eq!(first.per_channel, second.per_channel);
    }
}
