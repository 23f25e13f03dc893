//! HTTP transport from the agent to the collector

use super::address::normalize_url;
use crate::config::{AgentConfig, PushMode};
use crate::core::metrics::{Metric, MetricValue, SharedMetric};
use crate::core::model::{MetricsConverter, WireRecord};
use crate::core::providers::MetricStream;
use crate::utils::error::{MetricsError, Result, ResultExt};
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Sends collected metrics somewhere
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsPusher: Send + Sync {
    /// Drain `metrics` and transmit them, stopping at the first failure
    async fn push(&self, metrics: MetricStream, cancel: &CancellationToken) -> Result<()>;
}

/// Pushes metrics over HTTP with bounded parallelism.
///
/// Each request has its own timeout. Once the collector acknowledged a
/// counter, the pushed amount is subtracted from it, so it carries the delta
/// since the last confirmed push.
#[derive(Debug, Clone)]
pub struct HttpMetricsPusher {
    client: Client,
    base_url: String,
    converter: Arc<MetricsConverter>,
    mode: PushMode,
    parallel_limit: usize,
    batch_size: usize,
    push_timeout: Duration,
    compress: bool,
}

impl HttpMetricsPusher {
    pub fn new(config: &AgentConfig, converter: Arc<MetricsConverter>) -> Result<Self> {
        let base_url = normalize_url(&config.address).context("normalize url")?;
        let client = Client::builder()
            .build()
            .map_err(|e| MetricsError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            converter,
            mode: config.push_mode,
            parallel_limit: config.rate_limit.max(1),
            batch_size: config.batch_size.max(1),
            push_timeout: config.push_timeout(),
            compress: config.compress,
        })
    }

    pub fn with_timeout(mut self, push_timeout: Duration) -> Self {
        self.push_timeout = push_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn push_all(&self, metrics: MetricStream) -> Result<()> {
        match self.mode {
            PushMode::Json => {
                metrics
                    .chunks(self.batch_size)
                    .map(Ok)
                    .try_for_each_concurrent(self.parallel_limit, |batch| self.push_batch(batch))
                    .await
            }
            PushMode::Url => {
                metrics
                    .map(Ok)
                    .try_for_each_concurrent(self.parallel_limit, |metric| {
                        self.push_single(metric)
                    })
                    .await
            }
        }
    }

    async fn push_batch(&self, metrics: Vec<SharedMetric>) -> Result<()> {
        if metrics.is_empty() {
            info!("Nothing to push");
            return Ok(());
        }
        debug!("Push {} metrics", metrics.len());

        let sent: Vec<Metric> = metrics.iter().map(|metric| metric.as_ref().clone()).collect();
        let records = sent
            .iter()
            .map(|metric| self.converter.to_wire_record(metric))
            .collect::<Result<Vec<WireRecord>>>()
            .context("create model request")?;
        let body = serde_json::to_vec(&records).context("serialize model request")?;

        let mut request = self
            .client
            .post(format!("{}/updates/", self.base_url))
            .timeout(self.push_timeout)
            .header(CONTENT_TYPE, "application/json");

        request = if self.compress {
            request
                .header(CONTENT_ENCODING, "gzip")
                .body(gzip(&body).context("compress request")?)
        } else {
            request.body(body)
        };

        self.send(request).await.context("push metrics")?;

        for (metric, pushed) in metrics.iter().zip(&sent) {
            info!(metric = %metric.name(), value = %pushed.string_value(), "Pushed metric");
            metric.settle(pushed.current());
        }
        Ok(())
    }

    async fn push_single(&self, metric: SharedMetric) -> Result<()> {
        let pushed = metric.current();
        let url = self.update_url(metric.name(), pushed)?;

        let request = self
            .client
            .post(url)
            .timeout(self.push_timeout)
            .header(CONTENT_TYPE, "text/plain");

        self.send(request)
            .await
            .with_context(|| format!("push metric {}", metric.name()))?;

        info!(metric = %metric.name(), value = %pushed, "Pushed metric");
        metric.settle(pushed);
        Ok(())
    }

    /// `{base}/update/{type}/{name}/{value}` with every segment percent-encoded
    fn update_url(&self, name: &str, value: MetricValue) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MetricsError::config(format!("Invalid collector url: {}", e)))?;
        let rendered = value.to_string();
        url.path_segments_mut()
            .map_err(|_| {
                MetricsError::config(format!("Collector url cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["update", value.metric_type().as_str(), name, rendered.as_str()]);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MetricsError::timeout(format!("no response within {:?}", self.push_timeout))
            } else {
                MetricsError::from(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.context("read response body")?;
        if !status.is_success() {
            warn!("Unexpected response status code: {} {}", status, body);
            return Err(MetricsError::UnexpectedStatusCode {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsPusher for HttpMetricsPusher {
    async fn push(&self, metrics: MetricStream, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => Err(MetricsError::Cancelled),
            result = self.push_all(metrics) => result,
        }
    }
}

fn gzip(body: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(body)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signer::Signer;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pusher(server: &MockServer, config: AgentConfig) -> HttpMetricsPusher {
        let config = AgentConfig {
            address: server.uri(),
            ..config
        };
        let converter = Arc::new(MetricsConverter::new(Arc::new(Signer::disabled())));
        HttpMetricsPusher::new(&config, converter).unwrap()
    }

    fn stream(metrics: &[SharedMetric]) -> MetricStream {
        futures::stream::iter(metrics.to_vec()).boxed()
    }

    #[tokio::test]
    async fn test_json_push_resets_counters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let counter = Metric::counter("PollCount", 5).shared();
        let gauge = Metric::gauge("RandomValue", 0.5).shared();
        let pusher = pusher(&server, AgentConfig::default());

        pusher
            .push(stream(&[counter.clone(), gauge.clone()]), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(counter.current(), MetricValue::Counter(0));
        assert_eq!(gauge.current(), MetricValue::Gauge(0.5));

        let requests = server.received_requests().await.unwrap();
        let records: Vec<WireRecord> = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            records,
            vec![
                WireRecord::counter("PollCount", 5),
                WireRecord::gauge("RandomValue", 0.5)
            ]
        );
    }

    #[tokio::test]
    async fn test_json_push_splits_batches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(3)
            .mount(&server)
            .await;

        let metrics: Vec<SharedMetric> = (0..5)
            .map(|i| Metric::gauge(format!("g{}", i), i as f64).shared())
            .collect();
        let pusher = pusher(
            &server,
            AgentConfig {
                batch_size: 2,
                rate_limit: 2,
                ..AgentConfig::default()
            },
        );

        pusher
            .push(stream(&metrics), &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_push_keeps_counter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backup unavailable"))
            .mount(&server)
            .await;

        let counter = Metric::counter("PollCount", 7).shared();
        let pusher = pusher(&server, AgentConfig::default());

        let err = pusher
            .push(stream(&[counter.clone()]), &CancellationToken::new())
            .await
            .unwrap_err();

        match err.root_cause() {
            MetricsError::UnexpectedStatusCode { status, body } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "backup unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(counter.current(), MetricValue::Counter(7));
    }

    #[tokio::test]
    async fn test_url_mode_posts_each_metric() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update/counter/requests/3"))
            .and(header("content-type", "text/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/update/gauge/temp/37.1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let counter = Metric::counter("requests", 3).shared();
        let pusher = pusher(
            &server,
            AgentConfig {
                push_mode: PushMode::Url,
                ..AgentConfig::default()
            },
        );

        pusher
            .push(
                stream(&[counter.clone(), Metric::gauge("temp", 37.1).shared()]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(counter.current(), MetricValue::Counter(0));
    }

    #[tokio::test]
    async fn test_url_mode_encodes_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update/gauge/disk%20usage%2Fsda/0.5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let pusher = pusher(
            &server,
            AgentConfig {
                push_mode: PushMode::Url,
                ..AgentConfig::default()
            },
        );
        pusher
            .push(
                stream(&[Metric::gauge("disk usage/sda", 0.5).shared()]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_increments_during_push_survive() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .expect(1)
            .mount(&server)
            .await;

        let counter = Metric::counter("PollCount", 5).shared();
        let pusher = pusher(&server, AgentConfig::default());

        let poll = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            counter.set_value(3.0);
        };
        let cancel = CancellationToken::new();
        let (result, ()) = tokio::join!(
            pusher.push(stream(&[counter.clone()]), &cancel),
            poll
        );
        result.unwrap();

        let requests = server.received_requests().await.unwrap();
        let records: Vec<WireRecord> = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(records, vec![WireRecord::counter("PollCount", 5)]);
        assert_eq!(counter.current(), MetricValue::Counter(3));
    }

    #[tokio::test]
    async fn test_compressed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/updates/"))
            .and(header("content-encoding", "gzip"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let pusher = pusher(
            &server,
            AgentConfig {
                compress: true,
                ..AgentConfig::default()
            },
        );
        pusher
            .push(
                stream(&[Metric::gauge("g", 1.5).shared()]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let mut decoded = String::new();
        GzDecoder::new(&requests[0].body[..])
            .read_to_string(&mut decoded)
            .unwrap();
        let records: Vec<WireRecord> = serde_json::from_str(&decoded).unwrap();
        assert_eq!(records, vec![WireRecord::gauge("g", 1.5)]);
    }

    #[tokio::test]
    async fn test_push_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let pusher =
            pusher(&server, AgentConfig::default()).with_timeout(Duration::from_millis(50));
        let err = pusher
            .push(
                stream(&[Metric::gauge("g", 1.0).shared()]),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err.root_cause(), MetricsError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_cancelled_push() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = pusher(&server, AgentConfig::default())
            .push(stream(&[Metric::gauge("g", 1.0).shared()]), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, MetricsError::Cancelled));
    }

    #[test]
    fn test_rejects_empty_address() {
        let converter = Arc::new(MetricsConverter::new(Arc::new(Signer::disabled())));
        let config = AgentConfig {
            address: String::new(),
            ..AgentConfig::default()
        };
        assert!(HttpMetricsPusher::new(&config, converter).is_err());
    }
}
