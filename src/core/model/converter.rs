use super::WireRecord;
use crate::core::metrics::{Metric, MetricType, MetricValue};
use crate::core::signer::Signer;
use crate::utils::error::{MetricsError, Result, ResultExt};
use std::sync::Arc;
use tracing::warn;

/// Translates between [`WireRecord`] and [`Metric`], signing and verifying
/// records when a key is configured.
#[derive(Debug, Clone)]
pub struct MetricsConverter {
    signer: Arc<Signer>,
    sign_metrics: bool,
}

impl MetricsConverter {
    pub fn new(signer: Arc<Signer>) -> Self {
        let sign_metrics = signer.is_enabled();
        Self {
            signer,
            sign_metrics,
        }
    }

    pub fn sign_metrics(&self) -> bool {
        self.sign_metrics
    }

    pub fn to_wire_record(&self, metric: &Metric) -> Result<WireRecord> {
        let mut record = match metric.current() {
            MetricValue::Counter(delta) => WireRecord::counter(metric.name(), delta),
            MetricValue::Gauge(value) => WireRecord::gauge(metric.name(), value),
        };

        if self.sign_metrics {
            let signature = self
                .signer
                .sign_hex(metric)
                .context("get signature string")?;
            record.hash = Some(signature);
        }

        Ok(record)
    }

    /// Validate a record and build a fresh metric holding its value.
    pub fn from_wire_record(&self, record: &WireRecord) -> Result<Metric> {
        if record.id.is_empty() {
            return Err(MetricsError::validation("metric id is empty"));
        }
        if record.mtype.is_empty() {
            return Err(MetricsError::validation("metric type is empty"));
        }

        let metric_type: MetricType = record.mtype.parse().inspect_err(|_| {
            warn!("unknown metric type: {}", record.mtype);
        })?;

        let metric = match metric_type {
            MetricType::Counter => {
                let delta = record
                    .delta
                    .ok_or_else(|| MetricsError::value_missing(&record.id))
                    .context("convert metric")?;
                Metric::counter(&record.id, delta)
            }
            MetricType::Gauge => {
                let value = record
                    .value
                    .ok_or_else(|| MetricsError::value_missing(&record.id))
                    .context("convert metric")?;
                Metric::gauge(&record.id, value)
            }
        };

        if self.sign_metrics {
            if let Some(signature) = record.signature() {
                let valid = self
                    .signer
                    .check_sign(&metric, signature)
                    .context("check signature")?;
                if !valid {
                    return Err(MetricsError::InvalidSignature(record.id.clone())
                        .context("check signature"));
                }
            }
        }

        Ok(metric)
    }
}
