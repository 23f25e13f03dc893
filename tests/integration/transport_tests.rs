//! Agent pushing to a collector over a real socket

#[cfg(test)]
mod tests {
    use crate::common::TestCollector;
    use actix_web::web;
    use futures::StreamExt;
    use metrics_relay::agent::{HttpMetricsPusher, MetricsPusher};
    use metrics_relay::config::{AgentConfig, PushMode};
    use metrics_relay::core::metrics::{Metric, MetricValue, SharedMetric};
    use metrics_relay::core::model::MetricsConverter;
    use metrics_relay::core::signer::Signer;
    use metrics_relay::server::HttpServer;
    use metrics_relay::storage::MetricsStorage;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    /// Serve the collector on an ephemeral port and return its address
    fn serve(collector: &TestCollector) -> (String, actix_web::dev::ServerHandle) {
        let state = web::Data::new(collector.state.clone());
        let server = actix_web::HttpServer::new(move || HttpServer::create_app(state.clone()))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind collector");
        let address = server.addrs()[0].to_string();
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (address, handle)
    }

    async fn push(address: &str, key: &str, mode: PushMode, metrics: &[SharedMetric]) {
        let config = AgentConfig {
            address: address.to_string(),
            key: key.to_string(),
            push_mode: mode,
            batch_size: 2,
            compress: mode == PushMode::Json,
            ..AgentConfig::default()
        };
        let converter = Arc::new(MetricsConverter::new(Arc::new(Signer::new(key).unwrap())));
        let pusher = HttpMetricsPusher::new(&config, converter).unwrap();

        crate::assert_ok!(
            pusher
                .push(
                    futures::stream::iter(metrics.to_vec()).boxed(),
                    &CancellationToken::new()
                )
                .await
        );
    }

    #[actix_web::test]
    async fn test_signed_json_push() {
        let collector = TestCollector::file_backed(0).await.with_key("secret");
        let (address, handle) = serve(&collector);

        let counter = Metric::counter("PollCount", 3).shared();
        let metrics = vec![
            counter.clone(),
            Metric::gauge("RandomValue", 0.25).shared(),
            Metric::gauge("TotalMemory", 1024.0).shared(),
        ];

        push(&address, "secret", PushMode::Json, &metrics).await;
        assert_eq!(counter.current(), MetricValue::Counter(0));

        counter.set_value(2.0);
        push(&address, "secret", PushMode::Json, &[counter.clone()]).await;

        let snapshot = crate::assert_ok!(collector.storage.get_metric_values().await);
        assert_eq!(snapshot["counter"]["PollCount"], "5");
        assert_eq!(snapshot["gauge"]["RandomValue"], "0.25");
        assert_eq!(snapshot["gauge"]["TotalMemory"], "1024");

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_url_push() {
        let collector = TestCollector::file_backed(300).await;
        let (address, handle) = serve(&collector);

        push(
            &address,
            "",
            PushMode::Url,
            &[
                Metric::counter("requests", 5).shared(),
                Metric::gauge("temp", 37.1).shared(),
            ],
        )
        .await;

        let metric = crate::assert_ok!(collector.storage.get_metric("gauge", "temp").await);
        assert_eq!(metric.string_value(), "37.1");

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_push_with_wrong_key_fails() {
        let collector = TestCollector::file_backed(300).await.with_key("secret");
        let (address, handle) = serve(&collector);

        let config = AgentConfig {
            address,
            key: "other".to_string(),
            ..AgentConfig::default()
        };
        let converter =
            Arc::new(MetricsConverter::new(Arc::new(Signer::new("other").unwrap())));
        let pusher = HttpMetricsPusher::new(&config, converter).unwrap();

        let counter = Metric::counter("PollCount", 3).shared();
        let err = crate::assert_err!(
            pusher
                .push(
                    futures::stream::iter(vec![counter.clone()]).boxed(),
                    &CancellationToken::new()
                )
                .await
        );

        assert!(matches!(
            err.root_cause(),
            metrics_relay::MetricsError::UnexpectedStatusCode { status: 400, .. }
        ));
        assert_eq!(counter.current(), MetricValue::Counter(3));

        handle.stop(true).await;
    }
}
