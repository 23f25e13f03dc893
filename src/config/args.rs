//! Command-line flags and environment variables

use super::models::*;
use super::{load_file, validated};
use crate::utils::error::Result;
use crate::utils::logging::{LogFormat, LogLevel};
use clap::Parser;
use std::path::PathBuf;

/// Metrics collector
#[derive(Parser, Debug, Default)]
#[command(name = "collector", version, about = "Receives, stores and serves metrics")]
pub struct CollectorArgs {
    /// YAML configuration file
    #[arg(short, long, env = "CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Signing key
    #[arg(short, long, env = "KEY")]
    pub key: Option<String>,

    /// Backup interval in seconds, 0 for write-through
    #[arg(short = 'i', long, env = "STORE_INTERVAL")]
    pub store_interval: Option<u64>,

    /// Backup file path
    #[arg(short = 'f', long, env = "STORE_FILE")]
    pub store_file: Option<String>,

    /// Restore metric values from the backup at startup
    #[arg(short, long, env = "RESTORE")]
    pub restore: Option<bool>,

    /// Database connection string
    #[arg(short = 'd', long, env = "DATABASE_DSN")]
    pub database_dsn: Option<String>,

    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl CollectorArgs {
    /// Overlay these values on `config`
    pub fn merge(self, mut config: CollectorConfig) -> CollectorConfig {
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(key) = self.key {
            config.key = key;
        }
        if let Some(store_interval) = self.store_interval {
            config.store_interval = store_interval;
        }
        if let Some(store_file) = self.store_file {
            config.store_file = store_file;
        }
        if let Some(restore) = self.restore {
            config.restore = restore;
        }
        if self.database_dsn.is_some() {
            config.database_dsn = self.database_dsn;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_format) = self.log_format {
            config.log_format = log_format;
        }
        config
    }

    /// Resolve defaults, the optional file and these overrides
    pub async fn load(mut self) -> Result<CollectorConfig> {
        let base = match self.config.take() {
            Some(path) => load_file(path).await?,
            None => CollectorConfig::default(),
        };
        validated(self.merge(base))
    }
}

/// Metrics agent
#[derive(Parser, Debug, Default)]
#[command(name = "agent", version, about = "Collects host metrics and pushes them to a collector")]
pub struct AgentArgs {
    /// YAML configuration file
    #[arg(short, long, env = "CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Collector address
    #[arg(short, long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Signing key
    #[arg(short, long, env = "KEY")]
    pub key: Option<String>,

    /// Concurrent push requests
    #[arg(short = 'l', long, env = "RATE_LIMIT")]
    pub rate_limit: Option<usize>,

    /// Push timeout in seconds
    #[arg(short = 't', long, env = "PUSH_TIMEOUT")]
    pub push_timeout: Option<u64>,

    /// Push interval in seconds
    #[arg(short, long, env = "REPORT_INTERVAL")]
    pub report_interval: Option<u64>,

    /// Poll interval in seconds
    #[arg(short, long, env = "POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// url or json
    #[arg(long, env = "PUSH_MODE")]
    pub push_mode: Option<PushMode>,

    /// Records per JSON request
    #[arg(long, env = "BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Gzip request bodies
    #[arg(long, env = "COMPRESS")]
    pub compress: Option<bool>,

    /// Comma separated process statistics
    #[arg(long, env = "RUNTIME_METRICS", value_delimiter = ',')]
    pub runtime_metrics: Option<Vec<String>>,

    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl AgentArgs {
    /// Overlay these values on `config`
    pub fn merge(self, mut config: AgentConfig) -> AgentConfig {
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(key) = self.key {
            config.key = key;
        }
        if let Some(rate_limit) = self.rate_limit {
            config.rate_limit = rate_limit;
        }
        if let Some(push_timeout) = self.push_timeout {
            config.push_timeout = push_timeout;
        }
        if let Some(report_interval) = self.report_interval {
            config.report_interval = report_interval;
        }
        if let Some(poll_interval) = self.poll_interval {
            config.poll_interval = poll_interval;
        }
        if let Some(push_mode) = self.push_mode {
            config.push_mode = push_mode;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(compress) = self.compress {
            config.compress = compress;
        }
        if let Some(runtime_metrics) = self.runtime_metrics {
            config.runtime_metrics = runtime_metrics;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_format) = self.log_format {
            config.log_format = log_format;
        }
        config
    }

    /// Resolve defaults, the optional file and these overrides
    pub async fn load(mut self) -> Result<AgentConfig> {
        let base = match self.config.take() {
            Some(path) => load_file(path).await?,
            None => AgentConfig::default(),
        };
        validated(self.merge(base))
    }
}
