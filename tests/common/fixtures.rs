//! Collector fixtures backed by temporary directories

use metrics_relay::config::CollectorConfig;
use metrics_relay::core::model::MetricsConverter;
use metrics_relay::core::signer::Signer;
use metrics_relay::server::AppState;
use metrics_relay::server::builder::ServerBuilder;
use metrics_relay::storage::StorageStrategy;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A collector's storage and handler state living in its own directory.
///
/// Dropping the fixture without [`TestCollector::shutdown`] simulates a crash:
/// nothing is flushed.
pub struct TestCollector {
    pub dir: Arc<TempDir>,
    pub config: CollectorConfig,
    pub storage: Arc<StorageStrategy>,
    pub state: AppState,
}

impl TestCollector {
    /// File backup; `store_interval` 0 selects sync mode
    pub async fn file_backed(store_interval: u64) -> Self {
        let dir = Arc::new(TempDir::new().expect("create temp dir"));
        let config = CollectorConfig {
            store_interval,
            store_file: dir.path().join("metrics.json").display().to_string(),
            ..CollectorConfig::default()
        };
        Self::start(dir, config).await
    }

    /// SQLite database backup in its own file
    pub async fn database_backed() -> Self {
        let dir = Arc::new(TempDir::new().expect("create temp dir"));
        let path: PathBuf = dir.path().join("metrics.db");
        let config = CollectorConfig {
            database_dsn: Some(format!("sqlite://{}?mode=rwc", path.display())),
            database_max_connections: 1,
            ..CollectorConfig::default()
        };
        Self::start(dir, config).await
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.config.key = key.to_string();
        let signer = Signer::new(key).expect("create signer");
        self.state = AppState::new(
            self.storage.clone(),
            Arc::new(MetricsConverter::new(Arc::new(signer))),
        );
        self
    }

    async fn start(dir: Arc<TempDir>, config: CollectorConfig) -> Self {
        let storage = ServerBuilder::build_storage(&config)
            .await
            .expect("build storage");
        let converter = Arc::new(MetricsConverter::new(Arc::new(
            Signer::new(&config.key).expect("create signer"),
        )));
        let state = AppState::new(storage.clone(), converter);
        Self {
            dir,
            config,
            storage,
            state,
        }
    }

    /// Start again on the same directory and configuration
    pub async fn restart(&self) -> Self {
        Self::start(self.dir.clone(), self.config.clone()).await
    }

    /// Graceful stop: final backup and close
    pub async fn shutdown(&self) {
        self.storage.close().await.expect("close storage");
    }
}
