//! Wire representation of a metric exchanged between agent and collector

mod converter;

pub use converter::MetricsConverter;

use serde::{Deserialize, Serialize};

/// One metric on the wire.
///
/// `delta` is populated for counters and `value` for gauges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireRecord {
    /// Metric name
    pub id: String,
    /// `counter` or `gauge`
    #[serde(rename = "type")]
    pub mtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Hex HMAC-SHA256 signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl WireRecord {
    /// Record carrying only the identity, as used by value queries
    pub fn query(id: impl Into<String>, mtype: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mtype: mtype.into(),
            ..Default::default()
        }
    }

    pub fn counter(id: impl Into<String>, delta: i64) -> Self {
        Self {
            id: id.into(),
            mtype: "counter".to_string(),
            delta: Some(delta),
            ..Default::default()
        }
    }

    pub fn gauge(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            mtype: "gauge".to_string(),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Hash if present and non-empty
    pub fn signature(&self) -> Option<&str> {
        self.hash.as_deref().filter(|h| !h.is_empty())
    }
}
