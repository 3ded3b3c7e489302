//! ## busvakt-cli
//! **Operational entrypoint**
//!
//! Runs the monitored demo workload (a producer plus a named worker-thread
//! pool standing in for the delivery and dispatch collaborators) with both
//! monitors attached, or validates a configuration file.

use clap::Parser;

mod commands;
mod workload;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run_demo(args).await,
        Commands::CheckConfig(args) => commands::check_config(args),
    }
}
