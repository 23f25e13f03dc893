//! Backup behaviour across collector restarts

#[cfg(test)]
mod tests {
    use crate::common::TestCollector;
    use metrics_relay::core::metrics::Metric;
    use metrics_relay::storage::MetricsStorage;

    async fn add_counter(collector: &TestCollector, name: &str, delta: i64) {
        crate::assert_ok!(
            collector
                .storage
                .add_metric_values(vec![Metric::counter(name, delta).shared()])
                .await
        );
    }

    #[tokio::test]
    async fn test_async_mode_loses_unflushed_writes() {
        let collector = TestCollector::file_backed(300).await;
        assert!(!collector.storage.sync_mode());

        add_counter(&collector, "requests", 10).await;
        crate::assert_ok!(collector.storage.create_backup().await);
        add_counter(&collector, "requests", 5).await;

        // crash: no final backup
        let restarted = collector.restart().await;
        let metric = crate::assert_ok!(restarted.storage.get_metric("counter", "requests").await);
        assert_eq!(metric.string_value(), "10");
    }

    #[tokio::test]
    async fn test_async_mode_without_flush() {
        let collector = TestCollector::file_backed(300).await;
        add_counter(&collector, "requests", 10).await;

        let restarted = collector.restart().await;
        let err = crate::assert_err!(restarted.storage.get_metric("counter", "requests").await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_async_mode_graceful_shutdown_flushes() {
        let collector = TestCollector::file_backed(300).await;
        add_counter(&collector, "requests", 10).await;
        collector.shutdown().await;

        let restarted = collector.restart().await;
        let metric = crate::assert_ok!(restarted.storage.get_metric("counter", "requests").await);
        assert_eq!(metric.string_value(), "10");
    }

    #[tokio::test]
    async fn test_sync_mode_loses_nothing() {
        let collector = TestCollector::file_backed(0).await;
        assert!(collector.storage.sync_mode());

        add_counter(&collector, "requests", 10).await;
        add_counter(&collector, "requests", 5).await;

        let restarted = collector.restart().await;
        let metric = crate::assert_ok!(restarted.storage.get_metric("counter", "requests").await);
        assert_eq!(metric.string_value(), "15");
    }

    #[tokio::test]
    async fn test_database_backup_survives_restart() {
        let collector = TestCollector::database_backed().await;
        assert!(collector.storage.sync_mode());
        assert_eq!(collector.storage.backup().kind(), "database");

        add_counter(&collector, "requests", 7).await;
        crate::assert_ok!(
            collector
                .storage
                .add_metric_values(vec![Metric::gauge("temp", 37.1).shared()])
                .await
        );

        let restarted = collector.restart().await;
        let snapshot = crate::assert_ok!(restarted.storage.get_metric_values().await);
        assert_eq!(snapshot["counter"]["requests"], "7");
        assert_eq!(snapshot["gauge"]["temp"], "37.1");
    }

    #[tokio::test]
    async fn test_restore_disabled() {
        let collector = TestCollector::file_backed(0).await;
        add_counter(&collector, "requests", 3).await;

        let mut config = collector.config.clone();
        config.restore = false;
        let storage = crate::assert_ok!(
            metrics_relay::server::builder::ServerBuilder::build_storage(&config).await
        );
        assert!(crate::assert_ok!(storage.get_metric_values().await).is_empty());
    }
}
