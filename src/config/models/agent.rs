//! Agent configuration

use super::*;
use crate::utils::error::MetricsError;
use crate::utils::logging::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the agent transmits metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushMode {
    /// One `POST /update/{type}/{name}/{value}` per metric
    Url,
    /// JSON arrays posted to `/updates/`
    #[default]
    Json,
}

impl std::str::FromStr for PushMode {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "url" => Ok(PushMode::Url),
            "json" => Ok(PushMode::Json),
            _ => Err(MetricsError::config(format!("Invalid push mode: {}", s))),
        }
    }
}

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Collector address, `host:port` or a full URL
    #[serde(default = "default_address")]
    pub address: String,
    /// Shared signing key; empty disables signing
    #[serde(default)]
    pub key: String,
    /// Concurrent push requests
    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_push_timeout")]
    pub push_timeout: u64,
    /// Push period in seconds
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
    /// Provider refresh period in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default)]
    pub push_mode: PushMode,
    /// Records per JSON request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Gzip JSON request bodies
    #[serde(default)]
    pub compress: bool,
    /// Process statistics to report
    #[serde(default = "default_runtime_metrics")]
    pub runtime_metrics: Vec<String>,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            key: String::new(),
            rate_limit: default_rate_limit(),
            push_timeout: default_push_timeout(),
            report_interval: default_report_interval(),
            poll_interval: default_poll_interval(),
            push_mode: PushMode::default(),
            batch_size: default_batch_size(),
            compress: false,
            runtime_metrics: default_runtime_metrics(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AgentConfig {
    pub fn sign_metrics(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}
