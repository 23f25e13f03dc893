//! Server builder and run_server function

use crate::config::CollectorConfig;
use crate::core::model::MetricsConverter;
use crate::core::signer::Signer;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::storage::{BackupStorage, InMemoryStorage, StorageStrategy};
use crate::utils::error::{MetricsError, Result, ResultExt};
use crate::utils::worker::PeriodicWorker;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Assembles storage, converter and HTTP server from a configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<CollectorConfig>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(mut self, config: CollectorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Open the backup, compose it with the in-memory store and optionally
    /// load the last backup
    pub async fn build_storage(config: &CollectorConfig) -> Result<Arc<StorageStrategy>> {
        let backup = BackupStorage::from_config(config)
            .await
            .context("create backup storage")?;
        info!(
            "Using {} backup in {} mode",
            backup.kind(),
            if config.sync_mode() { "sync" } else { "async" }
        );

        let storage = Arc::new(StorageStrategy::new(
            Arc::new(InMemoryStorage::new()),
            backup,
            config.sync_mode(),
        ));

        if config.restore {
            info!("Restore metrics from backup");
            if let Err(e) = storage.restore_from_backup().await {
                error!("failed to restore state from backup: {}", e);
            }
        }

        Ok(storage)
    }

    /// Build the HTTP server and return it with the storage it serves
    pub async fn build(self) -> Result<(HttpServer, Arc<StorageStrategy>)> {
        let config = self
            .config
            .ok_or_else(|| MetricsError::config("Configuration is required"))?;

        let signer = Signer::new(&config.key).context("create signer")?;
        let converter = Arc::new(MetricsConverter::new(Arc::new(signer)));
        let storage = Self::build_storage(&config).await?;

        let state = AppState::new(storage.clone(), converter);
        Ok((HttpServer::new(&config, state), storage))
    }
}

/// Run the collector until shutdown, then flush a final backup
pub async fn run_server(config: CollectorConfig) -> Result<()> {
    let (server, storage) = ServerBuilder::new()
        .with_config(config.clone())
        .build()
        .await?;

    let cancel = CancellationToken::new();
    let backup_task = if storage.sync_mode() {
        None
    } else {
        info!("Start periodic backup every {}s", config.store_interval);
        let worker = PeriodicWorker::new("backup metrics", config.store_interval())?;
        let storage = storage.clone();
        Some(worker.spawn(cancel.clone(), move || {
            let storage = storage.clone();
            async move { storage.create_backup().await }
        }))
    };

    let served = server.start().await;

    cancel.cancel();
    if let Some(task) = backup_task {
        if let Err(e) = task.await {
            error!("backup worker panicked: {}", e);
        }
    }

    if let Err(e) = storage.close().await {
        error!("failed to close storage: {}", e);
        served?;
        return Err(e);
    }

    served
}
