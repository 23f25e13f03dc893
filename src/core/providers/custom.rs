use super::{MetricStream, MetricsProvider, stream_of};
use crate::core::metrics::{Metric, MetricType, SharedMetric};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// `PollCount` counter and `RandomValue` gauge
pub struct CustomMetricsProvider {
    poll_count: SharedMetric,
    random_value: SharedMetric,
}

impl CustomMetricsProvider {
    pub fn new() -> Self {
        Self {
            poll_count: Metric::new("PollCount", MetricType::Counter).shared(),
            random_value: Metric::new("RandomValue", MetricType::Gauge).shared(),
        }
    }
}

impl Default for CustomMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsProvider for CustomMetricsProvider {
    fn name(&self) -> &str {
        "custom"
    }

    async fn update(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(MetricsError::Cancelled);
        }

        self.poll_count.set_value(1.0);
        self.random_value.set_value(rand::random::<f64>());

        debug!(
            poll_count = %self.poll_count.string_value(),
            random_value = %self.random_value.string_value(),
            "updated custom metrics"
        );
        Ok(())
    }

    fn metrics(&self) -> MetricStream {
        stream_of(&[self.poll_count.clone(), self.random_value.clone()])
    }
}
