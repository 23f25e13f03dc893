//! Configuration data models

#![allow(missing_docs)]

pub mod agent;
pub mod collector;
pub mod database;

pub use agent::*;
pub use collector::*;
pub use database::*;

/// Default collector address
pub fn default_address() -> String {
    "localhost:8080".to_string()
}

/// Default backup flush interval in seconds
pub fn default_store_interval() -> u64 {
    300
}

pub fn default_store_file() -> String {
    "/tmp/metrics-db.json".to_string()
}

pub fn default_restore() -> bool {
    true
}

pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_rate_limit() -> usize {
    20
}

/// Default push timeout in seconds
pub fn default_push_timeout() -> u64 {
    10
}

pub fn default_report_interval() -> u64 {
    10
}

pub fn default_poll_interval() -> u64 {
    2
}

pub fn default_batch_size() -> usize {
    100
}

/// Process statistics collected by default
pub fn default_runtime_metrics() -> Vec<String> {
    ["Alloc", "Sys", "CPUPercent", "Uptime"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
