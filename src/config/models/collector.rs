//! Collector configuration

use super::*;
use crate::utils::logging::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Collector (server) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Listen address, `host:port`
    #[serde(default = "default_address")]
    pub address: String,
    /// Shared signing key; empty disables signature checks
    #[serde(default)]
    pub key: String,
    /// Backup flush interval in seconds; 0 writes through on every update
    #[serde(default = "default_store_interval")]
    pub store_interval: u64,
    /// Backup file path; empty disables the file backup
    #[serde(default = "default_store_file")]
    pub store_file: String,
    /// Load the backup into memory at startup
    #[serde(default = "default_restore")]
    pub restore: bool,
    /// Database connection string; when set the database replaces the file backup
    #[serde(default)]
    pub database_dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            key: String::new(),
            store_interval: default_store_interval(),
            store_file: default_store_file(),
            restore: default_restore(),
            database_dsn: None,
            database_max_connections: default_max_connections(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl CollectorConfig {
    /// Database settings, present only when a non-empty DSN is configured
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_dsn
            .as_deref()
            .map(str::trim)
            .filter(|dsn| !dsn.is_empty())
            .map(|dsn| DatabaseConfig {
                max_connections: self.database_max_connections,
                ..DatabaseConfig::new(dsn)
            })
    }

    /// Write-through mode: a database is configured or the flush interval is zero
    pub fn sync_mode(&self) -> bool {
        self.database().is_some() || self.store_interval == 0
    }

    pub fn sign_metrics(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn store_interval(&self) -> Duration {
        Duration::from_secs(self.store_interval)
    }
}
