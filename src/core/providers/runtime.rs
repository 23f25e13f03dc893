use super::probe::{Probe, ProcessSample};
use super::{MetricStream, MetricsProvider, stream_of};
use crate::core::metrics::{Metric, MetricType, SharedMetric};
use crate::utils::error::{MetricsError, Result, ResultExt};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Process statistic exported as a gauge of the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStat {
    /// Resident set size in bytes
    Alloc,
    /// Virtual memory size in bytes
    Sys,
    CpuPercent,
    DiskRead,
    DiskWritten,
    /// Seconds since process start
    Uptime,
    /// Process start as seconds since the epoch
    StartTime,
}

impl RuntimeStat {
    pub const ALL: [RuntimeStat; 7] = [
        RuntimeStat::Alloc,
        RuntimeStat::Sys,
        RuntimeStat::CpuPercent,
        RuntimeStat::DiskRead,
        RuntimeStat::DiskWritten,
        RuntimeStat::Uptime,
        RuntimeStat::StartTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeStat::Alloc => "Alloc",
            RuntimeStat::Sys => "Sys",
            RuntimeStat::CpuPercent => "CPUPercent",
            RuntimeStat::DiskRead => "DiskRead",
            RuntimeStat::DiskWritten => "DiskWritten",
            RuntimeStat::Uptime => "Uptime",
            RuntimeStat::StartTime => "StartTime",
        }
    }

    pub fn read(&self, sample: &ProcessSample) -> f64 {
        match self {
            RuntimeStat::Alloc => sample.resident_memory as f64,
            RuntimeStat::Sys => sample.virtual_memory as f64,
            RuntimeStat::CpuPercent => sample.cpu_percent,
            RuntimeStat::DiskRead => sample.disk_read_bytes as f64,
            RuntimeStat::DiskWritten => sample.disk_written_bytes as f64,
            RuntimeStat::Uptime => sample.run_time_secs as f64,
            RuntimeStat::StartTime => sample.start_time_secs as f64,
        }
    }
}

impl fmt::Display for RuntimeStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuntimeStat {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        RuntimeStat::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| MetricsError::UnknownStatName(s.to_string()))
    }
}

/// Gauges for a configured list of process statistics
pub struct RuntimeMetricsProvider {
    probe: Arc<Mutex<Probe>>,
    metrics: Vec<(RuntimeStat, SharedMetric)>,
}

impl RuntimeMetricsProvider {
    /// Resolve `names` against the stat table. Unknown names fail here.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::with_probe(names, Probe::new())
    }

    pub fn with_probe<S: AsRef<str>>(names: &[S], probe: Probe) -> Result<Self> {
        let metrics = names
            .iter()
            .map(|name| -> Result<(RuntimeStat, SharedMetric)> {
                let stat: RuntimeStat = name.as_ref().parse()?;
                Ok((stat, Metric::new(stat.name(), MetricType::Gauge).shared()))
            })
            .collect::<Result<Vec<_>>>()
            .context("create runtime metrics provider")?;

        Ok(Self {
            probe: Arc::new(Mutex::new(probe)),
            metrics,
        })
    }

    /// Provider over every known statistic
    pub fn all() -> Self {
        Self {
            probe: Arc::new(Mutex::new(Probe::new())),
            metrics: RuntimeStat::ALL
                .into_iter()
                .map(|stat| (stat, Metric::new(stat.name(), MetricType::Gauge).shared()))
                .collect(),
        }
    }
}

#[async_trait]
impl MetricsProvider for RuntimeMetricsProvider {
    fn name(&self) -> &str {
        "runtime"
    }

    async fn update(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(MetricsError::Cancelled);
        }

        let probe = self.probe.clone();
        let sample = tokio::task::spawn_blocking(move || probe.lock().process())
            .await
            .map_err(|e| MetricsError::internal(format!("sample process statistics: {}", e)))?;
        for (stat, metric) in &self.metrics {
            metric.set_value(stat.read(&sample));
            debug!(metric = %stat, value = %metric.string_value(), "updated runtime metric");
        }
        Ok(())
    }

    fn metrics(&self) -> MetricStream {
        let metrics: Vec<SharedMetric> = self.metrics.iter().map(|(_, m)| m.clone()).collect();
        stream_of(&metrics)
    }
}
