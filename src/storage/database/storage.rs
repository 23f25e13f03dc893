//! Metrics storage on top of a relational database

use super::seaorm_db::{DbRecord, MetricsDatabase};
use crate::core::metrics::{Metric, MetricType, MetricValue, SharedMetric};
use crate::storage::{MetricsSnapshot, MetricsStorage, snapshot_insert};
use crate::utils::error::{MetricsError, Result, ResultExt};
use async_trait::async_trait;
use std::sync::Arc;

/// Database-backed backup store.
///
/// Values are kept as doubles; counters are converted back to integers on
/// read.
#[derive(Clone)]
pub struct DbStorage {
    database: Arc<dyn MetricsDatabase>,
}

impl DbStorage {
    pub fn new(database: Arc<dyn MetricsDatabase>) -> Self {
        Self { database }
    }

    pub async fn ping(&self) -> Result<()> {
        self.database.ping().await
    }

    pub async fn close(&self) -> Result<()> {
        self.database.close().await
    }

    fn to_db_record(metric: &Metric) -> DbRecord {
        DbRecord::new(metric.metric_type().as_str(), metric.name(), metric.value())
    }

    fn value_string(metric_type: &str, value: f64) -> String {
        match metric_type {
            "counter" => (value as i64).to_string(),
            _ => value.to_string(),
        }
    }

    fn from_db_record(record: &DbRecord) -> Result<Metric> {
        let (type_name, name, value) = record.fields().context("read record")?;
        let metric_type: MetricType = type_name
            .parse()
            .with_context(|| format!("read record with type '{}'", type_name))?;

        let value = match metric_type {
            MetricType::Counter => MetricValue::Counter(value as i64),
            MetricType::Gauge => MetricValue::Gauge(value),
        };
        Ok(Metric::with_value(name, value))
    }
}

impl std::fmt::Debug for DbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbStorage").finish_non_exhaustive()
    }
}

#[async_trait]
impl MetricsStorage for DbStorage {
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>> {
        let records: Vec<DbRecord> = metrics.iter().map(|m| Self::to_db_record(m)).collect();

        self.database
            .update_records(&records)
            .await
            .context("update db record")?;

        Ok(metrics)
    }

    async fn get_metric_values(&self) -> Result<MetricsSnapshot> {
        let records = self
            .database
            .read_all_records()
            .await
            .context("read all db records")?;

        let mut snapshot = MetricsSnapshot::new();
        for record in &records {
            let (type_name, name, value) = record.fields().context("read record")?;
            snapshot_insert(
                &mut snapshot,
                type_name,
                name,
                Self::value_string(type_name, value),
            );
        }

        Ok(snapshot)
    }

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric> {
        let record = self
            .database
            .read_record(metric_type, name)
            .await
            .context("read db record")?
            .ok_or_else(|| MetricsError::not_found(metric_type, name))?;

        Ok(Self::from_db_record(&record)?.shared())
    }

    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()> {
        let mut records = Vec::new();
        for (type_name, by_name) in &snapshot {
            for (name, raw) in by_name {
                let value: f64 = raw
                    .parse()
                    .map_err(|e| MetricsError::parsing(format!("{:?}: {}", raw, e)))
                    .context("parse metric value")?;
                records.push(DbRecord::new(type_name, name, value));
            }
        }

        self.database
            .update_records(&records)
            .await
            .context("update records")
    }
}
