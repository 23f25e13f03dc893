//! Storage layer of the collector
//!
//! The in-memory store is authoritative. A backup store (JSON file or
//! database) keeps a durable copy, written through on every update or flushed
//! periodically depending on the [`StorageStrategy`] mode.

/// Backup selection
pub mod backup;
/// Database backup
pub mod database;
/// File backup
pub mod files;
/// In-memory storage
pub mod memory;
/// In-memory plus backup composition
pub mod strategy;

pub use backup::BackupStorage;
pub use files::{FileStorage, StorageRecord};
pub use memory::InMemoryStorage;
pub use strategy::StorageStrategy;

use crate::core::metrics::SharedMetric;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Metric type -> metric name -> canonical string value
pub type MetricsSnapshot = BTreeMap<String, BTreeMap<String, String>>;

/// Read/write contract shared by every store
#[async_trait]
pub trait MetricsStorage: Send + Sync {
    /// Apply updates and return the resulting instances in input order
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>>;

    async fn get_metric_values(&self) -> Result<MetricsSnapshot>;

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric>;

    /// Replace the whole content with `snapshot`
    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()>;
}

/// Insert one value into a snapshot
pub(crate) fn snapshot_insert(
    snapshot: &mut MetricsSnapshot,
    metric_type: impl Into<String>,
    name: impl Into<String>,
    value: impl Into<String>,
) {
    snapshot
        .entry(metric_type.into())
        .or_default()
        .insert(name.into(), value.into());
}
