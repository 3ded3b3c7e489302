//! Lock-light store of message-lifecycle counters.
//!
//! Written by arbitrarily many producer/consumer threads on the hot message
//! path and read by the periodic report cycle. Discipline is atomic
//! operations per field/key, never a global lock.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use dashmap::DashMap;

use crate::flow::channel::ChannelId;
use crate::snapshot::ChannelStats;

/// Per-channel counter cell. `pending` rises on send and falls on
/// receive/fail, so it can transiently diverge under reordered updates;
/// the divergence is bounded and drains with the events.
#[derive(Debug, Default)]
struct ChannelCounters {
    sent: AtomicU64,
    pending: AtomicI64,
}

/// Global and per-channel message-lifecycle counters.
///
/// Created once at component start with all counters zero and never reset.
/// All mutation operations are constant-time atomic updates; readers never
/// block writers.
#[derive(Debug, Default)]
pub struct FlowRegistry {
    sent: AtomicU64,
    received: AtomicU64,
    pending: AtomicI64,
    failed: AtomicU64,

    tasks_started: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,

    channels: DashMap<ChannelId, ChannelCounters>,
}

/// Point-in-time value read of a [`FlowRegistry`].
///
/// Each field is read independently; this is not a transaction across
/// counters.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowCounters {
    pub sent: u64,
    pub received: u64,
    pub pending: i64,
    pub failed: u64,
    pub tasks_started: u64,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    /// Per-channel stats in map iteration order; sorted at snapshot build.
    pub per_channel: Vec<ChannelStats>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message handed to the delivery collaborator.
    #[inline]
    pub fn record_sent(&self, channel: &str) {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::Relaxed);

        let entry = self.channels.entry(ChannelId::normalize(channel)).or_default();
        entry.sent.fetch_add(1, Ordering::Relaxed);
        entry.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a message picked up by a consumer.
    #[inline]
    pub fn record_received(&self, channel: &str) {
        self.received.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_sub(1, Ordering::Relaxed);

        let entry = self.channels.entry(ChannelId::normalize(channel)).or_default();
        entry.pending.fetch_sub(1, Ordering::Relaxed);
    }

    /// Records a message the delivery collaborator gave up on.
    #[inline]
    pub fn record_failed(&self, channel: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_sub(1, Ordering::Relaxed);

        let entry = self.channels.entry(ChannelId::normalize(channel)).or_default();
        entry.pending.fetch_sub(1, Ordering::Relaxed);
    }

    /// Bracket call from the dispatch collaborator when a blocking task starts.
    #[inline]
    pub fn task_started(&self) {
        self.tasks_started.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn task_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Best-effort field-by-field read of all counters.
    pub fn counters(&self) -> FlowCounters {
        let per_channel = self
            .channels
            .iter()
            .map(|entry| ChannelStats {
                channel: entry.key().clone(),
                sent: entry.value().sent.load(Ordering::Relaxed),
                pending: entry.value().pending.load(Ordering::Relaxed),
            })
            .collect();

        FlowCounters {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            tasks_started: self.tasks_started.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            per_channel,
        }
    }
}
