//! Typed metric model
//!
//! A [`Metric`] is a named counter or gauge. Counters accumulate every update
//! (fractional deltas are truncated toward zero), gauges keep the last value.
//! Every read and write of the value goes through a per-metric lock.

mod types;

pub use types::{MetricType, MetricValue};

use hmac::Mac;
use hmac::digest::FixedOutputReset;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Metric shared between providers, storages and in-flight pushes
pub type SharedMetric = Arc<Metric>;

/// Anything that can feed a deterministic representation into a MAC
pub trait HashHolder {
    /// Canonical `"{name}:{type}:{value}"` string
    fn hash_input(&self) -> String;

    fn get_hash<M: Mac + FixedOutputReset>(&self, mac: &mut M) -> Vec<u8> {
        Mac::update(mac, self.hash_input().as_bytes());
        mac.finalize_reset().into_bytes().to_vec()
    }
}

pub struct Metric {
    name: String,
    value: RwLock<MetricValue>,
}

impl Metric {
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        Self::with_value(name, MetricValue::zero(metric_type))
    }

    pub fn with_value(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(value),
        }
    }

    pub fn counter(name: impl Into<String>, value: i64) -> Self {
        Self::with_value(name, MetricValue::Counter(value))
    }

    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self::with_value(name, MetricValue::Gauge(value))
    }

    pub fn shared(self) -> SharedMetric {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric_type(&self) -> MetricType {
        self.value.read().metric_type()
    }

    /// Consistent copy of the current value
    pub fn current(&self) -> MetricValue {
        *self.value.read()
    }

    pub fn value(&self) -> f64 {
        self.value.read().as_f64()
    }

    pub fn string_value(&self) -> String {
        self.value.read().to_string()
    }

    /// Apply an update and return the resulting value.
    ///
    /// Counters add `value` truncated toward zero, gauges replace.
    pub fn set_value(&self, value: f64) -> f64 {
        let mut guard = self.value.write();
        match &mut *guard {
            MetricValue::Counter(current) => *current = current.saturating_add(value as i64),
            MetricValue::Gauge(current) => *current = value,
        }
        guard.as_f64()
    }

    /// Apply another metric's value using this metric's accumulation rule
    pub fn apply(&self, update: MetricValue) -> MetricValue {
        let mut guard = self.value.write();
        match (&mut *guard, update) {
            (MetricValue::Counter(current), MetricValue::Counter(delta)) => {
                *current = current.saturating_add(delta)
            }
            (MetricValue::Counter(current), MetricValue::Gauge(delta)) => {
                *current = current.saturating_add(delta as i64)
            }
            (MetricValue::Gauge(current), other) => *current = other.as_f64(),
        }
        *guard
    }

    /// Reset a counter to zero. Gauges are untouched.
    pub fn jump_to_original_state(&self) {
        let mut guard = self.value.write();
        if let MetricValue::Counter(current) = &mut *guard {
            *current = 0;
        }
    }

    /// Remove an acknowledged push from a counter.
    ///
    /// Only the pushed amount is subtracted, so increments made while the
    /// push was in flight are kept for the next one. Gauges are untouched.
    pub fn settle(&self, pushed: MetricValue) {
        let mut guard = self.value.write();
        if let (MetricValue::Counter(current), MetricValue::Counter(sent)) = (&mut *guard, pushed) {
            *current = current.saturating_sub(sent);
        }
    }
}

impl HashHolder for Metric {
    fn hash_input(&self) -> String {
        match self.current() {
            MetricValue::Counter(v) => format!("{}:counter:{}", self.name, v),
            MetricValue::Gauge(v) => format!("{}:gauge:{:.6}", self.name, v),
        }
    }
}

impl Clone for Metric {
    fn clone(&self) -> Self {
        Self::with_value(self.name.clone(), self.current())
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric")
            .field("name", &self.name)
            .field("value", &self.current())
            .finish()
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.current() == other.current()
    }
}
