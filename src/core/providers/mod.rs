//! Metric providers polled by the agent
//!
//! A provider owns a fixed set of metrics. `update` refreshes their values and
//! `metrics` hands out a one-shot stream over the current instances.

mod aggregate;
mod custom;
mod probe;
mod runtime;
mod system;

pub use aggregate::AggregateMetricsProvider;
pub use custom::CustomMetricsProvider;
pub use probe::{HostSample, Probe, ProcessSample};
pub use runtime::{RuntimeMetricsProvider, RuntimeStat};
pub use system::SystemMetricsProvider;

use crate::core::metrics::SharedMetric;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

/// Finite, non-restartable sequence of metrics
pub type MetricStream = BoxStream<'static, SharedMetric>;

#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Short name used in logs and error context
    fn name(&self) -> &str;

    /// Refresh every owned metric
    async fn update(&self, cancel: &CancellationToken) -> Result<()>;

    /// Fresh stream over the current metric instances
    fn metrics(&self) -> MetricStream;
}

pub(crate) fn stream_of(metrics: &[SharedMetric]) -> MetricStream {
    use futures::StreamExt;
    futures::stream::iter(metrics.to_vec()).boxed()
}
