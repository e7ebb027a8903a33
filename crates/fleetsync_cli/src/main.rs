//! Fleetsync daemon
//!
//! Bridges vehicle status between two fleet APIs: reads operational state
//! and position from the provider on a fixed polling interval and forwards
//! changed values to the consumer's REST interface.
//!
//! # Commands
//!
//! - `run` - Start the sync loop (default when no command is given)
//! - `check-config` - Validate the configuration and print the vehicle pairing

mod config;

use clap::{Parser, Subcommand};
use config::BridgeConfig;
use fleetsync_engine::{
    HttpConsumerClient, HttpProviderClient, Scheduler, SyncCoordinator, SyncResult,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Vehicle status bridge between two fleet APIs.
#[derive(Parser)]
#[command(name = "fleetsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(global = true, short, long, default_value = "fleetsync.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sync loop
    Run,

    /// Validate the configuration and print the vehicle pairing
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> SyncResult<()> {
    let config = BridgeConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::CheckConfig => {
            let mapping = config.vehicle_mapping()?;
            println!("configuration OK ({} vehicles)", mapping.len());
            for (provider_id, consumer_id) in mapping.pairs() {
                println!("  {provider_id} -> {consumer_id}");
            }
            Ok(())
        }
        Commands::Run => {
            let mapping = config.vehicle_mapping()?;
            let provider = HttpProviderClient::new(
                config.provider.base_url.clone(),
                config.provider.api_key.clone(),
            )?;
            let consumer = HttpConsumerClient::new(
                config.consumer.base_url.clone(),
                config.consumer.api_key.clone(),
            )?;

            let coordinator = SyncCoordinator::new(mapping, provider, consumer);
            let scheduler = Scheduler::new(coordinator, config.interval())?;

            info!(
                vehicles = scheduler.coordinator().mapping().len(),
                interval_secs = config.interval().as_secs(),
                "fleetsync started"
            );

            tokio::select! {
                _ = scheduler.run() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                }
            }
            Ok(())
        }
    }
}
