//! Agent side of the pipeline
//!
//! Two periodic loops share one cancellation token: the poll loop refreshes
//! the providers and the push loop drains them and sends the values to the
//! collector.

mod address;
mod pusher;

pub use address::normalize_url;
#[cfg(test)]
pub use pusher::MockMetricsPusher;
pub use pusher::{HttpMetricsPusher, MetricsPusher};

use crate::config::AgentConfig;
use crate::core::model::MetricsConverter;
use crate::core::providers::{
    AggregateMetricsProvider, CustomMetricsProvider, MetricsProvider, RuntimeMetricsProvider,
    SystemMetricsProvider,
};
use crate::core::signer::Signer;
use crate::utils::error::{MetricsError, Result, ResultExt};
use crate::utils::worker::PeriodicWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Poll and push loops bound to one provider and one pusher
pub struct MetricsAgent {
    provider: Arc<dyn MetricsProvider>,
    pusher: Arc<dyn MetricsPusher>,
    poll_interval: Duration,
    report_interval: Duration,
}

impl MetricsAgent {
    pub fn new(
        provider: Arc<dyn MetricsProvider>,
        pusher: Arc<dyn MetricsPusher>,
        poll_interval: Duration,
        report_interval: Duration,
    ) -> Self {
        Self {
            provider,
            pusher,
            poll_interval,
            report_interval,
        }
    }

    /// Wire the shipped providers and an HTTP pusher from configuration
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let runtime = RuntimeMetricsProvider::new(config.runtime_metrics.as_slice())?;
        let provider = AggregateMetricsProvider::new(vec![
            Arc::new(CustomMetricsProvider::new()),
            Arc::new(runtime),
            Arc::new(SystemMetricsProvider::new()),
        ]);

        let signer = Signer::new(&config.key).context("create signer")?;
        let converter = Arc::new(MetricsConverter::new(Arc::new(signer)));
        let pusher = HttpMetricsPusher::new(config, converter).context("create pusher")?;
        info!(
            "Pushing to {} every {}s, polling every {}s",
            pusher.base_url(),
            config.report_interval,
            config.poll_interval
        );

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(pusher),
            config.poll_interval(),
            config.report_interval(),
        ))
    }

    /// One refresh of every provider
    pub async fn poll(&self, cancel: &CancellationToken) -> Result<()> {
        self.provider
            .update(cancel)
            .await
            .context("update metrics")
    }

    /// One push of the current provider values
    pub async fn push(&self, cancel: &CancellationToken) -> Result<()> {
        self.pusher
            .push(self.provider.metrics(), cancel)
            .await
            .context("push metrics")
    }

    /// Run both loops until `cancel` fires
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let poll_worker = PeriodicWorker::new("poll metrics", self.poll_interval)?;
        let push_worker = PeriodicWorker::new("push metrics", self.report_interval)?;

        let poll = {
            let agent = self.clone();
            let token = cancel.clone();
            poll_worker.spawn(cancel.clone(), move || {
                let agent = agent.clone();
                let token = token.clone();
                async move { agent.poll(&token).await }
            })
        };

        let push = {
            let agent = self.clone();
            let token = cancel.clone();
            push_worker.spawn(cancel.clone(), move || {
                let agent = agent.clone();
                let token = token.clone();
                async move { agent.push(&token).await }
            })
        };

        let (poll, push) = tokio::join!(poll, push);
        poll.map_err(|e| MetricsError::internal(format!("poll loop panicked: {}", e)))?;
        push.map_err(|e| MetricsError::internal(format!("push loop panicked: {}", e)))?;

        info!("Agent stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::{Metric, MetricValue, SharedMetric};
    use crate::core::providers::MetricStream;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        polls: AtomicUsize,
        counter: SharedMetric,
    }

    #[async_trait]
    impl MetricsProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn update(&self, _cancel: &CancellationToken) -> Result<()> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.counter.set_value(1.0);
            Ok(())
        }

        fn metrics(&self) -> MetricStream {
            futures::stream::iter(vec![self.counter.clone()]).boxed()
        }
    }

    fn provider() -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            polls: AtomicUsize::new(0),
            counter: Metric::counter("PollCount", 0).shared(),
        })
    }

    #[tokio::test]
    async fn test_push_hands_provider_stream_to_pusher() {
        let provider = provider();
        provider.update(&CancellationToken::new()).await.unwrap();

        let mut pusher = MockMetricsPusher::new();
        pusher.expect_push().times(1).returning(|metrics, _| {
            let names: Vec<String> = futures::executor::block_on(
                metrics.map(|m| m.name().to_string()).collect::<Vec<_>>(),
            );
            assert_eq!(names, vec!["PollCount"]);
            Ok(())
        });

        let agent = MetricsAgent::new(
            provider,
            Arc::new(pusher),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        agent.push(&CancellationToken::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_push_error_is_wrapped() {
        let mut pusher = MockMetricsPusher::new();
        pusher.expect_push().returning(|_, _| {
            Err(MetricsError::UnexpectedStatusCode {
                status: 500,
                body: "down".to_string(),
            })
        });

        let agent = MetricsAgent::new(
            provider(),
            Arc::new(pusher),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        let err = agent.push(&CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("push metrics"));
        assert!(matches!(
            err.root_cause(),
            MetricsError::UnexpectedStatusCode { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_run_until_cancelled() {
        let provider = provider();
        let pushes = Arc::new(AtomicUsize::new(0));

        let mut pusher = MockMetricsPusher::new();
        let counted = pushes.clone();
        pusher.expect_push().returning(move |_, _| {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let agent = Arc::new(MetricsAgent::new(
            provider.clone(),
            Arc::new(pusher),
            Duration::from_millis(20),
            Duration::from_millis(50),
        ));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(agent.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(180)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert!(provider.polls.load(Ordering::SeqCst) >= 2);
        assert!(pushes.load(Ordering::SeqCst) >= 1);
        assert!(matches!(
            provider.counter.current(),
            MetricValue::Counter(n) if n >= 2
        ));
    }

    #[test]
    fn test_from_config_rejects_unknown_stat() {
        let config = AgentConfig {
            runtime_metrics: vec!["Bogus".to_string()],
            ..AgentConfig::default()
        };
        let err = MetricsAgent::from_config(&config).err().unwrap();
        assert!(matches!(err.root_cause(), MetricsError::UnknownStatName(_)));
    }
}
