use crate::config::DatabaseConfig;
use crate::utils::error::{MetricsError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Connect to the configured database
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = Self::try_connect(&config.url, config).await?;
        let backend_type = DatabaseBackendType::from_url(&config.url);
        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Connect and bring the schema up to date
    pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<Self> {
        let database = Self::new(config).await?;
        database.migrate().await?;
        Ok(database)
    }

    async fn try_connect(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url.to_string());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(MetricsError::Database)
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            MetricsError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(super) async fn ping_connection(&self) -> Result<()> {
        debug!("Performing database ping");
        self.db.ping().await.map_err(MetricsError::Database)
    }

    pub(super) async fn close_connection(&self) -> Result<()> {
        self.db.clone().close().await.map_err(MetricsError::Database)
    }
}
