//! # metrics-relay
//!
//! A host metrics agent and the collector it reports to.
//!
//! - **Typed metrics**: counters accumulate deltas, gauges keep the last value
//! - **Signed transport**: optional HMAC-SHA256 signatures on every wire record
//! - **Two-tier storage**: an in-memory store backed by a JSON file or a
//!   database, written through on every update or flushed periodically
//! - **Bounded push pipeline**: the agent pushes with a fixed number of
//!   concurrent requests and a per-request timeout
//!
//! ## Collector
//!
//! ```rust,no_run
//! use metrics_relay::config::CollectorConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CollectorConfig {
//!         store_interval: 0,
//!         ..CollectorConfig::default()
//!     };
//!     metrics_relay::server::run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod agent;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use utils::error::{MetricsError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl BuildInfo {
    /// Build time as RFC 3339, or the raw value if it is not a timestamp
    pub fn build_date(&self) -> String {
        self.build_time
            .parse::<i64>()
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|date| date.to_rfc3339())
            .unwrap_or_else(|| self.build_time.to_string())
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "version {}, built {}, commit {}",
            self.version,
            self.build_date(),
            self.git_hash
        )
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
