//! Metrics collector
//!
//! Receives metric updates over HTTP, keeps them in memory and backs them up
//! to a JSON file or a database.

use clap::Parser;
use metrics_relay::config::CollectorArgs;
use metrics_relay::server;
use metrics_relay::utils::logging::LoggingUtils;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = CollectorArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CollectorArgs) -> anyhow::Result<()> {
    let config = args.load().await?;
    LoggingUtils::init_logger(Some(config.log_level), config.log_format)?;

    info!("Starting collector, {}", metrics_relay::build_info());
    info!(
        address = %config.address,
        store_interval = config.store_interval,
        store_file = %config.store_file,
        restore = config.restore,
        database = config.database().is_some(),
        signing = config.sign_metrics(),
        "Collector configuration"
    );

    server::run_server(config)
        .await
        .inspect_err(|e| error!("collector failed: {}", e))?;
    Ok(())
}
