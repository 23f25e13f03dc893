use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// SeaORM-based database implementation
#[derive(Debug)]
pub struct SeaOrmDatabase {
    pub(super) db: DatabaseConnection,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

impl DatabaseBackendType {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite") {
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        }
    }
}

/// Joined (type, name, value) row. Any field may be unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbRecord {
    pub metric_type: Option<String>,
    pub name: Option<String>,
    pub value: Option<f64>,
}

impl DbRecord {
    pub fn new(metric_type: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            metric_type: Some(metric_type.into()),
            name: Some(name.into()),
            value: Some(value),
        }
    }

    /// Borrow all three fields, failing on the first unset one
    pub fn fields(&self) -> Result<(&str, &str, f64)> {
        let metric_type = self
            .metric_type
            .as_deref()
            .ok_or(MetricsError::InvalidRecordType)?;
        let name = self.name.as_deref().ok_or(MetricsError::InvalidRecordName)?;
        let value = self.value.ok_or(MetricsError::InvalidRecordValue)?;
        Ok((metric_type, name, value))
    }
}

/// Operations the database backup needs from a relational store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsDatabase: Send + Sync {
    async fn ping(&self) -> Result<()>;

    /// Upsert every record by (type, name) in one transaction
    async fn update_records(&self, records: &[DbRecord]) -> Result<()>;

    async fn read_record(&self, metric_type: &str, name: &str) -> Result<Option<DbRecord>>;

    async fn read_all_records(&self) -> Result<Vec<DbRecord>>;

    async fn close(&self) -> Result<()>;
}
