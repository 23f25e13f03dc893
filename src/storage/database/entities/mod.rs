/// Metric value entity module
pub mod metric;
/// Metric type entity module
pub mod metric_type;

pub use metric::Entity as Metric;
pub use metric_type::Entity as MetricType;
