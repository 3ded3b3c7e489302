//! Threshold evaluation over flow snapshots.

use serde::Serialize;

use crate::snapshot::FlowSnapshot;

/// Conditions a snapshot can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    HighBacklog,
    HighPending,
}

/// A named condition plus a rendered figure for the report sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// Warning thresholds. Configuration inputs, not constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub backlog_warn: i64,
    pub pending_warn: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            backlog_warn: 100,
            pending_warn: 50,
        }
    }
}

/// Applies `thresholds` to `snapshot`. Pure: no side effects, no mutation.
///
/// A metric sitting exactly on its threshold does not fire; only strict
/// excess does.
pub fn evaluate(snapshot: &FlowSnapshot, thresholds: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if snapshot.backlog > thresholds.backlog_warn {
        alerts.push(Alert {
            kind: AlertKind::HighBacklog,
            message: format!("High queue backlog detected: {} messages", snapshot.backlog),
        });
    }

    if snapshot.pending > thresholds.pending_warn {
        alerts.push(Alert {
            kind: AlertKind::HighPending,
            message: format!("High pending messages: {} messages", snapshot.pending),
        });
    }

    alerts
}
