//! Local JSON file backup implementation

use super::types::StorageRecord;
use crate::core::metrics::SharedMetric;
use crate::storage::{MetricsSnapshot, MetricsStorage, snapshot_insert};
use crate::utils::error::{MetricsError, Result, ResultExt};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Metric backup kept in a single JSON file.
///
/// An empty path disables the store: writes are accepted and dropped, reads
/// see nothing.
#[derive(Debug)]
pub struct FileStorage {
    path: Option<PathBuf>,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open the backup file, creating it with an empty array if missing
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            info!("File backup disabled: no store file configured");
            return Ok(Self {
                path: None,
                lock: Mutex::new(()),
            });
        }

        let storage = Self {
            path: Some(path.to_path_buf()),
            lock: Mutex::new(()),
        };

        if fs::metadata(path).await.is_err() {
            info!("Init storage file in {}", path.display());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .context("create storage directory")?;
            }
            storage
                .write_records(&[])
                .await
                .context("init storage file")?;
        }

        Ok(storage)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn read_records(&self) -> Result<Vec<StorageRecord>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };

        let content = match fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&content).context("decode storage")
    }

    async fn write_records(&self, records: &[StorageRecord]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_vec_pretty(records)?;
        let tmp_path = Self::tmp_path(path);

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&content).await?;
        file.write_all(b"\n").await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, path).await?;
        debug!("wrote {} records to {}", records.len(), path.display());
        Ok(())
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl MetricsStorage for FileStorage {
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>> {
        let _guard = self.lock.lock().await;

        let updated: HashSet<(String, String)> = metrics
            .iter()
            .map(|m| (m.metric_type().as_str().to_string(), m.name().to_string()))
            .collect();

        let mut records: Vec<StorageRecord> = self
            .read_records()
            .await
            .context("read records")?
            .into_iter()
            .filter(|record| match (&record.metric_type, &record.name) {
                (Some(t), Some(n)) => !updated.contains(&(t.clone(), n.clone())),
                _ => true,
            })
            .collect();

        records.extend(metrics.iter().map(|m| StorageRecord::from_metric(m)));

        self.write_records(&records)
            .await
            .context("write records")?;
        Ok(metrics)
    }

    async fn get_metric_values(&self) -> Result<MetricsSnapshot> {
        let _guard = self.lock.lock().await;
        let records = self
            .read_records()
            .await
            .context("read records from file")?;

        let mut snapshot = MetricsSnapshot::new();
        for record in &records {
            let (metric_type, name, value) = record.fields()?;
            snapshot_insert(&mut snapshot, metric_type, name, value);
        }
        Ok(snapshot)
    }

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric> {
        let _guard = self.lock.lock().await;
        let records = self
            .read_records()
            .await
            .context("read records from file")?;

        let record = records
            .iter()
            .find(|record| record.matches(metric_type, name))
            .ok_or_else(|| MetricsError::not_found(metric_type, name))?;

        Ok(record.to_metric()?.shared())
    }

    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()> {
        let _guard = self.lock.lock().await;

        let records: Vec<StorageRecord> = snapshot
            .iter()
            .flat_map(|(metric_type, by_name)| {
                by_name
                    .iter()
                    .map(move |(name, value)| StorageRecord::new(metric_type, name, value))
            })
            .collect();

        self.write_records(&records)
            .await
            .context("write records to file")
    }
}
