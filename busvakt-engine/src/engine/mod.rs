mod monitor;
mod runtime;
mod scheduler;

pub use self::{
    monitor::{FlowMonitor, RuntimeMonitor},
    runtime::MonitorRuntime,
    scheduler::{PeriodicScheduler, SchedulerHandle},
};

pub mod prelude {
    pub use super::{FlowMonitor, MonitorRuntime, PeriodicScheduler, RuntimeMonitor};
}
