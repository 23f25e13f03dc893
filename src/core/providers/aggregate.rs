use super::{MetricStream, MetricsProvider};
use crate::utils::error::{Result, ResultExt};
use async_trait::async_trait;
use futures::StreamExt;
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

const FAN_IN_BUFFER: usize = 64;

/// Combines several providers into one.
///
/// Updates run concurrently and the first failure cancels the rest. Metric
/// streams are merged; order is kept within a provider only.
pub struct AggregateMetricsProvider {
    providers: Vec<Arc<dyn MetricsProvider>>,
}

impl AggregateMetricsProvider {
    pub fn new(providers: Vec<Arc<dyn MetricsProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl MetricsProvider for AggregateMetricsProvider {
    fn name(&self) -> &str {
        "aggregate"
    }

    async fn update(&self, cancel: &CancellationToken) -> Result<()> {
        let group = cancel.child_token();

        let updates = self.providers.iter().map(|provider| {
            let group = group.clone();
            async move {
                let result = provider
                    .update(&group)
                    .await
                    .with_context(|| format!("update {} metrics", provider.name()));
                if result.is_err() {
                    group.cancel();
                }
                result
            }
        });

        try_join_all(updates).await.map(|_| ())
    }

    fn metrics(&self) -> MetricStream {
        let (tx, rx) = mpsc::channel(FAN_IN_BUFFER);

        for provider in &self.providers {
            let mut stream = provider.metrics();
            let tx = tx.clone();
            tokio::spawn(async move {
                while let Some(metric) = stream.next().await {
                    if tx.send(metric).await.is_err() {
                        break;
                    }
                }
            });
        }

        // the channel closes once every producer task has dropped its sender
        drop(tx);
        ReceiverStream::new(rx).boxed()
    }
}
