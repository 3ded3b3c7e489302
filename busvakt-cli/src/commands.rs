use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use busvakt_config::{BusvaktConfig, ConfigError};
use busvakt_engine::MonitorRuntime;
use busvakt_telemetry::logging::EventLogger;

use crate::workload::{DemoWorkload, WorkloadOptions};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the demo workload with both monitors attached
    Run(RunArgs),
    /// Validate a configuration file and exit
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file; defaults to config/busvakt.yaml plus environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after this many seconds (runs until Ctrl-C if omitted)
    #[arg(long)]
    pub duration: Option<u64>,

    /// Interval between produced messages in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub send_interval_ms: u64,

    /// Simulated task duration in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub task_ms: u64,

    /// Task duration for the designated slow worker thread
    #[arg(long, default_value_t = 5000)]
    pub slow_task_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: PathBuf,
}

pub async fn run_demo(args: RunArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = load_config(args.config.as_ref())?;
    EventLogger::init_with_filter(&config.telemetry.log_filter);
    info!("Starting busvakt demo with monitoring attached");

    let runtime = Arc::new(MonitorRuntime::new(&config));
    runtime.start();

    let workload = DemoWorkload::start(
        runtime.clone(),
        &config,
        WorkloadOptions {
            send_interval_ms: args.send_interval_ms,
            task_duration_ms: args.task_ms,
            slow_task_duration_ms: args.slow_task_ms,
        },
    )?;

    // Detailed dump once the pool is up, mirroring the post-deploy report.
    runtime.detailed_report();

    match args.duration {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => {
            tokio::signal::ctrl_c().await?;
            info!("Ctrl-C received, shutting down");
        }
    }

    workload.stop().await;
    runtime.detailed_report();
    runtime.shutdown().await;
    Ok(())
}

pub fn check_config(args: CheckConfigArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = BusvaktConfig::load_from_path(&args.config)?;
    println!(
        "Configuration OK: flow interval {}ms, runtime interval {}ms, thread pattern '{}'",
        config.flow.interval_ms, config.runtime.interval_ms, config.runtime.thread_pattern
    );
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<BusvaktConfig, ConfigError> {
    match path {
        Some(path) => BusvaktConfig::load_from_path(path),
        None => BusvaktConfig::load(),
    }
}
