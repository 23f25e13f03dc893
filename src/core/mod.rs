//! Core metric model shared by the agent and the collector
//!
//! - `metrics`: counter and gauge values with their update rules
//! - `signer`: HMAC-SHA256 integrity signatures
//! - `model`: wire records and the converter between wire and model
//! - `providers`: metric sources polled by the agent

pub mod metrics;
pub mod model;
pub mod providers;
pub mod signer;

pub use metrics::{HashHolder, Metric, MetricType, MetricValue, SharedMetric};
pub use model::{MetricsConverter, WireRecord};
pub use signer::Signer;
