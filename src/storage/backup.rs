//! Backup storage backend chosen once at startup

use super::database::{DbStorage, SeaOrmDatabase};
use super::files::FileStorage;
use super::{MetricsSnapshot, MetricsStorage};
use crate::config::CollectorConfig;
use crate::core::metrics::SharedMetric;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Backup storage backend
#[derive(Debug)]
pub enum BackupStorage {
    /// JSON file
    File(FileStorage),
    /// Relational database
    Database(DbStorage),
}

impl BackupStorage {
    /// Build the backend named by the configuration: a database when a DSN
    /// is set, the store file otherwise
    pub async fn from_config(config: &CollectorConfig) -> Result<Self> {
        match config.database() {
            Some(database) => {
                info!("Initializing database backup storage");
                let database = SeaOrmDatabase::connect_and_migrate(&database).await?;
                Ok(BackupStorage::Database(DbStorage::new(Arc::new(database))))
            }
            None => {
                info!("Initializing file backup storage: {}", config.store_file);
                Ok(BackupStorage::File(FileStorage::new(&config.store_file).await?))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BackupStorage::File(_) => "file",
            BackupStorage::Database(_) => "database",
        }
    }

    /// Reachability check; the file backend has nothing to ping
    pub async fn ping(&self) -> Result<()> {
        match self {
            BackupStorage::File(_) => Ok(()),
            BackupStorage::Database(storage) => storage.ping().await,
        }
    }

    /// Close storage connections
    pub async fn close(&self) -> Result<()> {
        match self {
            BackupStorage::File(_) => Ok(()),
            BackupStorage::Database(storage) => storage.close().await,
        }
    }
}

#[async_trait]
impl MetricsStorage for BackupStorage {
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>> {
        match self {
            BackupStorage::File(storage) => storage.add_metric_values(metrics).await,
            BackupStorage::Database(storage) => storage.add_metric_values(metrics).await,
        }
    }

    async fn get_metric_values(&self) -> Result<MetricsSnapshot> {
        match self {
            BackupStorage::File(storage) => storage.get_metric_values().await,
            BackupStorage::Database(storage) => storage.get_metric_values().await,
        }
    }

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric> {
        match self {
            BackupStorage::File(storage) => storage.get_metric(metric_type, name).await,
            BackupStorage::Database(storage) => storage.get_metric(metric_type, name).await,
        }
    }

    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()> {
        match self {
            BackupStorage::File(storage) => storage.restore(snapshot).await,
            BackupStorage::Database(storage) => storage.restore(snapshot).await,
        }
    }
}
