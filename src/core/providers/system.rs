use super::probe::Probe;
use super::{MetricStream, MetricsProvider, stream_of};
use crate::core::metrics::{Metric, MetricType, SharedMetric};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Host memory and per-CPU utilisation gauges
pub struct SystemMetricsProvider {
    probe: Arc<Mutex<Probe>>,
    total_memory: SharedMetric,
    free_memory: SharedMetric,
    cpu_utilization: Vec<SharedMetric>,
}

impl SystemMetricsProvider {
    pub fn new() -> Self {
        Self::with_probe(Probe::new())
    }

    pub fn with_probe(probe: Probe) -> Self {
        let cpu_utilization = (1..=probe.cpu_count())
            .map(|n| Metric::new(format!("CPUutilization{}", n), MetricType::Gauge).shared())
            .collect();

        Self {
            probe: Arc::new(Mutex::new(probe)),
            total_memory: Metric::new("TotalMemory", MetricType::Gauge).shared(),
            free_memory: Metric::new("FreeMemory", MetricType::Gauge).shared(),
            cpu_utilization,
        }
    }
}

impl Default for SystemMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsProvider for SystemMetricsProvider {
    fn name(&self) -> &str {
        "system"
    }

    async fn update(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(MetricsError::Cancelled);
        }

        let probe = self.probe.clone();
        let sample = tokio::task::spawn_blocking(move || probe.lock().host())
            .await
            .map_err(|e| MetricsError::internal(format!("sample host statistics: {}", e)))?;

        self.total_memory.set_value(sample.total_memory as f64);
        self.free_memory.set_value(sample.free_memory as f64);
        for (metric, usage) in self.cpu_utilization.iter().zip(sample.cpu_utilization) {
            metric.set_value(usage);
        }

        debug!(
            total_memory = sample.total_memory,
            free_memory = sample.free_memory,
            cpus = self.cpu_utilization.len(),
            "updated system metrics"
        );
        Ok(())
    }

    fn metrics(&self) -> MetricStream {
        let mut metrics = Vec::with_capacity(self.cpu_utilization.len() + 2);
        metrics.push(self.total_memory.clone());
        metrics.push(self.free_memory.clone());
        metrics.extend(self.cpu_utilization.iter().cloned());
        stream_of(&metrics)
    }
}
