//! Database backup implementation using SeaORM
//!
//! Metric values live in a `metrics` table keyed by name and a reference to
//! the `metric_types` lookup table.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;
/// Metrics storage adapter
pub mod storage;

pub use seaorm_db::{DatabaseBackendType, DbRecord, MetricsDatabase, SeaOrmDatabase};
pub use storage::DbStorage;
