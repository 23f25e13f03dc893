//! Authoritative live metric store

use super::{MetricsSnapshot, MetricsStorage, snapshot_insert};
use crate::core::metrics::{Metric, MetricType, MetricValue, SharedMetric};
use crate::utils::error::{MetricsError, Result, ResultExt};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

type MetricsByType = HashMap<MetricType, HashMap<String, SharedMetric>>;

/// Type-partitioned map of live metrics behind one reader/writer lock
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    metrics: RwLock<MetricsByType>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.metrics.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(snapshot: &MetricsSnapshot) -> Result<MetricsByType> {
        let mut metrics = MetricsByType::new();

        for (type_name, values) in snapshot {
            let metric_type: MetricType = type_name
                .parse()
                .with_context(|| format!("handle backup metric with type '{}'", type_name))?;
            let by_name = metrics.entry(metric_type).or_default();

            for (name, raw) in values {
                let value = MetricValue::parse(metric_type, raw)
                    .with_context(|| format!("parse value of {}/{}", type_name, name))?;
                by_name.insert(name.clone(), Metric::with_value(name.clone(), value).shared());
            }
        }

        Ok(metrics)
    }
}

#[async_trait]
impl MetricsStorage for InMemoryStorage {
    async fn add_metric_values(&self, metrics: Vec<SharedMetric>) -> Result<Vec<SharedMetric>> {
        let mut store = self.metrics.write();
        let mut result = Vec::with_capacity(metrics.len());

        for metric in metrics {
            let by_name = store.entry(metric.metric_type()).or_default();
            let canonical = match by_name.get(metric.name()) {
                Some(current) => {
                    current.apply(metric.current());
                    current.clone()
                }
                None => {
                    by_name.insert(metric.name().to_string(), metric.clone());
                    metric
                }
            };
            result.push(canonical);
        }

        Ok(result)
    }

    async fn get_metric_values(&self) -> Result<MetricsSnapshot> {
        let store = self.metrics.read();
        let mut snapshot = MetricsSnapshot::new();

        for (metric_type, by_name) in store.iter() {
            for (name, metric) in by_name {
                snapshot_insert(&mut snapshot, metric_type.as_str(), name, metric.string_value());
            }
        }

        Ok(snapshot)
    }

    async fn get_metric(&self, metric_type: &str, name: &str) -> Result<SharedMetric> {
        let not_found = || MetricsError::not_found(metric_type, name);
        let parsed: MetricType = metric_type.parse().map_err(|_| not_found())?;

        self.metrics
            .read()
            .get(&parsed)
            .and_then(|by_name| by_name.get(name))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn restore(&self, snapshot: MetricsSnapshot) -> Result<()> {
        let rebuilt = Self::build(&snapshot)?;
        *self.metrics.write() = rebuilt;
        Ok(())
    }
}
