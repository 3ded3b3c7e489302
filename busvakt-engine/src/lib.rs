//! # busvakt-engine
//!
//! Wires the monitoring core together: periodic schedulers drive the
//! `sample -> build -> evaluate -> report` cycle for the message-flow and
//! runtime monitors, decoupled from the threads that mutate counters.

pub mod engine;

pub use engine::{
    FlowMonitor, MonitorRuntime, PeriodicScheduler, RuntimeMonitor, SchedulerHandle,
};
