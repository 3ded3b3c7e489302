//! Fixed-interval report scheduling with stop-and-drain cancellation.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use busvakt_core::SampleError;

pub struct PeriodicScheduler;

impl PeriodicScheduler {
    /// Runs `cycle` every `period` on a dedicated tokio task, starting one
    /// period after spawn. The cycle fires regardless of message volume,
    /// and runs off the threads that mutate counters.
    ///
    /// A cycle returning `Err` is a degraded cycle: it is logged and the
    /// scheduler retries on the next tick. Nothing here can take the
    /// owning process down.
    pub fn spawn<F>(name: &'static str, period: Duration, mut cycle: F) -> SchedulerHandle
    where
        F: FnMut() -> Result<(), SampleError> + Send + 'static,
    {
        let (shutdown, mut signal) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(error) = cycle() {
                            warn!(monitor = name, %error, "Degraded report cycle, skipping");
                        }
                    }
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!(monitor = name, "Scheduler drained");
        });

        SchedulerHandle { shutdown, task }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop-and-drain: prevents future ticks and waits for the task to
    /// finish. A cycle already in progress completes its report.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
