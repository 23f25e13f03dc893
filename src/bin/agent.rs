//! Metrics agent
//!
//! Polls host and process statistics and pushes them to a collector.

use clap::Parser;
use metrics_relay::agent::MetricsAgent;
use metrics_relay::config::AgentArgs;
use metrics_relay::utils::logging::LoggingUtils;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = AgentArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: AgentArgs) -> anyhow::Result<()> {
    let config = args.load().await?;
    LoggingUtils::init_logger(Some(config.log_level), config.log_format)?;

    info!("Starting agent, {}", metrics_relay::build_info());
    let agent = Arc::new(MetricsAgent::from_config(&config)?);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!("failed to listen for shutdown signal: {}", e),
        }
        shutdown.cancel();
    });

    agent.run(cancel).await?;
    Ok(())
}
