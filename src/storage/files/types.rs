use crate::core::metrics::{Metric, MetricType, MetricValue};
use crate::utils::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};

/// One persisted metric value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "types", default)]
    pub metric_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl StorageRecord {
    pub fn new(
        metric_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            metric_type: Some(metric_type.into()),
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    pub fn from_metric(metric: &Metric) -> Self {
        Self::new(
            metric.metric_type().as_str(),
            metric.name(),
            metric.string_value(),
        )
    }

    pub fn matches(&self, metric_type: &str, name: &str) -> bool {
        self.metric_type.as_deref() == Some(metric_type) && self.name.as_deref() == Some(name)
    }

    /// Borrow all three fields, failing on the first unset one
    pub fn fields(&self) -> Result<(&str, &str, &str)> {
        let metric_type = self
            .metric_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(MetricsError::InvalidRecordType)?;
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(MetricsError::InvalidRecordName)?;
        let value = self
            .value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(MetricsError::InvalidRecordValue)?;
        Ok((metric_type, name, value))
    }

    pub fn to_metric(&self) -> Result<Metric> {
        let (metric_type, name, value) = self.fields()?;
        let metric_type: MetricType = metric_type.parse()?;
        let value = MetricValue::parse(metric_type, value)?;
        Ok(Metric::with_value(name, value))
    }
}
