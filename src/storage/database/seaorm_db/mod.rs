// Module declarations
mod connection;
mod metric_ops;
mod types;

// Re-export public types
#[cfg(test)]
pub use types::MockMetricsDatabase;
pub use types::{DatabaseBackendType, DbRecord, MetricsDatabase, SeaOrmDatabase};
