//! In-memory storage composed with a backup store

use super::{BackupStorage, InMemoryStorage, MetricsSnapshot, MetricsStorage};
use crate::core::metrics::SharedMetric;
use crate::utils::error::{Result, ResultExt};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Serves reads from memory and keeps the backup current.
///
/// In sync mode every accepted update is written through to the backup
/// before the call returns. Otherwise the backup only changes on
/// [`create_backup`](Self::create_backup), which the collector runs
/// periodically and once more on shutdown.
pub struct StorageStrategy {
    memory: Arc<InMemoryStorage>,
    backup: BackupStorage,
    sync_mode: bool,
    lock: RwLock<()>,
}

impl StorageStrategy {
    pub fn new(memory: Arc<InMemoryStorage>, backup: BackupStorage, sync_mode: bool) -> Self {
        Self {
            memory,
            backup,
            sync_mode,
            lock: RwLock::new(()),
        }
    }

    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    pub fn backup(&self) -> &BackupStorage {
        &self.backup
    }

    /// Copy the in-memory state over the backup
    pub async fn create_backup(&self) -> Result<()> {
        let current = self
            .memory
            .get_metric_values()
            .await
            .context("get metrics from memory storage")?;

        debug!(
            "Writing {} metric types to {} backup",
            current.len(),
            self.backup.kind()
        );
        self.backup.restore(current).await
    }

    /// Replace the in-memory state with the backup content
    pub async fn restore_from_backup(&self) -> Result<()> {
        let restored = self
            .backup
            .get_metric_values()
            .await
            .context("get metrics from backup storage")?;

        let _guard = self.lock.write().await;
        self.memory.restore(restored).await
    }

    /// Reachability of the backup store
    pub async fn ping(&self) -> Result<()> {
        self.backup.ping().await
    }

    /// Flush a final backup and release the backup store
    pub async fn close(&self) -> Result<()> {
        info!("Creating final backup");
        self.create_backup().await.context("final backup")?;
        self.backup.close().await
    }
}

impl std::fmt::Debug for StorageStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageStrategy")
            .field("backup", &self.backup.kind())
            .field("sync_mode", &self.sync_mode)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MetricsStorage for StorageStrategy {
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>> {
        let _guard = self.lock.write().await;

        let result = self
            .memory
            .add_metric_values(metrics)
            .await
            .context("add metric values to memory storage")?;

        if self.sync_mode {
            self.backup
                .add_metric_values(result.clone())
                .await
                .context("add metric values to backup storage")?;
        }

        Ok(result)
    }

    async fn get_metric_values(&self) -> Result<MetricsSnapshot> {
        let _guard = self.lock.read().await;
        self.memory.get_metric_values().await
    }

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric> {
        let _guard = self.lock.read().await;
        self.memory.get_metric(metric_type, name).await
    }

    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()> {
        let _guard = self.lock.write().await;
        self.memory.restore(snapshot).await
    }
}
