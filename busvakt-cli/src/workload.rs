//! Demo traffic generator.
//!
//! Stands in for the delivery and dispatch collaborators: a tokio producer
//! feeds a crossbeam channel consumed by a pool of named worker threads.
//! Every lifecycle transition is reported to the monitor runtime, and the
//! first worker thread is deliberately slow so the backlog warnings have
//! something to bite on.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam::channel;
use tokio::sync::watch;
use tokio::task;
use tracing::{debug, info, warn};

use busvakt_config::BusvaktConfig;
use busvakt_engine::MonitorRuntime;

/// Channel the demo traffic flows over.
pub const TASK_CHANNEL: &str = "worker.task";

#[derive(Debug, Clone, Copy)]
pub struct WorkloadOptions {
    pub send_interval_ms: u64,
    pub task_duration_ms: u64,
    pub slow_task_duration_ms: u64,
}

pub struct DemoWorkload {
    stop: watch::Sender<bool>,
    producer: task::JoinHandle<()>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl DemoWorkload {
    /// Spawns the worker pool and the producer. Worker threads are named
    /// after the first configured pool so the runtime monitor's thread
    /// classification sees them.
    pub fn start(
        runtime: Arc<MonitorRuntime>,
        config: &BusvaktConfig,
        options: WorkloadOptions,
    ) -> std::io::Result<Self> {
        let (sender, receiver) = channel::unbounded::<String>();

        let (pool_name, pool_size) = config
            .runtime
            .pools
            .first()
            .map(|pool| (pool.name.clone(), pool.size))
            .unwrap_or_else(|| ("worker-pool".to_string(), 3));

        info!("Starting demo worker pool '{pool_name}' with {pool_size} threads");

        let mut workers = Vec::with_capacity(pool_size);
        for index in 0..pool_size {
            let receiver = receiver.clone();
            let runtime = runtime.clone();
            let task_duration = if index == 0 {
                Duration::from_millis(options.slow_task_duration_ms)
            } else {
                Duration::from_millis(options.task_duration_ms)
            };

            let handle = thread::Builder::new()
                .name(format!("{pool_name}-thread-{index}"))
                .spawn(move || {
                    runtime.register_local_consumer();
                    for message in receiver.iter() {
                        runtime.on_received(TASK_CHANNEL);
                        runtime.task_started();
                        debug!("Processing task: {message}");
                        thread::sleep(task_duration);
                        runtime.task_completed();
                    }
                    runtime.deregister_local_consumer();
                })?;
            workers.push(handle);
        }

        let (stop, mut stop_signal) = watch::channel(false);
        let producer_runtime = runtime.clone();
        let send_interval = Duration::from_millis(options.send_interval_ms.max(1));

        let producer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(send_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now_ms = SystemTime::now()
                            .duration_since(UNIX_EPOCH)
                            .map(|elapsed| elapsed.as_millis())
                            .unwrap_or_default();
                        let message = format!("Task at {now_ms}");

                        producer_runtime.on_sent(TASK_CHANNEL);
                        if sender.send(message).is_err() {
                            producer_runtime.on_failed(TASK_CHANNEL);
                            warn!("Task queue disconnected, stopping producer");
                            break;
                        }
                        debug!("Sent task message");
                    }
                    changed = stop_signal.changed() => {
                        if changed.is_err() || *stop_signal.borrow() {
                            break;
                        }
                    }
                }
            }
            // Dropping the sender lets the workers drain and exit.
        });

        Ok(Self {
            stop,
            producer,
            workers,
        })
    }

    /// Stops the producer, lets the workers drain the queue, and joins them.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.producer.await;

        let workers = self.workers;
        let _ = task::spawn_blocking(move || {
            for worker in workers {
                let _ = worker.join();
            }
        })
        .await;

        info!("Demo workload stopped");
    }
}
