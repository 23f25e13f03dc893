use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use sea_orm::*;
use tracing::{debug, error};

use super::super::entities::{metric, metric_type};
use super::types::{DbRecord, MetricsDatabase, SeaOrmDatabase};

impl SeaOrmDatabase {
    async fn type_id<C: ConnectionTrait>(conn: &C, type_name: &str) -> Result<i32> {
        let existing = metric_type::Entity::find()
            .filter(metric_type::Column::Name.eq(type_name))
            .one(conn)
            .await?;

        if let Some(model) = existing {
            return Ok(model.id);
        }

        let inserted = metric_type::ActiveModel {
            name: Set(Some(type_name.to_string())),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(inserted.id)
    }

    async fn upsert<C: ConnectionTrait>(conn: &C, record: &DbRecord) -> Result<()> {
        let (type_name, name, value) = record.fields()?;
        let type_id = Self::type_id(conn, type_name).await?;

        let existing = metric::Entity::find()
            .filter(metric::Column::Name.eq(name))
            .filter(metric::Column::TypeId.eq(type_id))
            .one(conn)
            .await?;

        match existing {
            Some(model) => {
                let mut active: metric::ActiveModel = model.into();
                active.value = Set(Some(value));
                active.update(conn).await?;
            }
            None => {
                metric::ActiveModel {
                    name: Set(Some(name.to_string())),
                    type_id: Set(Some(type_id)),
                    value: Set(Some(value)),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
            }
        }

        Ok(())
    }

    fn to_record(row: (metric::Model, Option<metric_type::Model>)) -> DbRecord {
        let (value_row, type_row) = row;
        DbRecord {
            metric_type: type_row.and_then(|t| t.name),
            name: value_row.name,
            value: value_row.value,
        }
    }
}

#[async_trait]
impl MetricsDatabase for SeaOrmDatabase {
    async fn ping(&self) -> Result<()> {
        self.ping_connection().await
    }

    async fn update_records(&self, records: &[DbRecord]) -> Result<()> {
        let txn = self.db.begin().await?;

        for record in records {
            if let Err(e) = Self::upsert(&txn, record).await {
                if let Err(rollback_error) = txn.rollback().await {
                    error!("Fail to rollback transaction: {}", rollback_error);
                }
                return Err(e);
            }
        }

        txn.commit().await.map_err(|e| {
            error!("Fail to commit transaction: {}", e);
            MetricsError::Database(e)
        })?;

        debug!("Upserted {} metric records", records.len());
        Ok(())
    }

    async fn read_record(&self, type_name: &str, name: &str) -> Result<Option<DbRecord>> {
        let rows = metric::Entity::find()
            .find_also_related(metric_type::Entity)
            .filter(metric::Column::Name.eq(name))
            .filter(metric_type::Column::Name.eq(type_name))
            .all(&self.db)
            .await?;

        if rows.len() > 1 {
            error!(
                "More than one metric in logical primary key: {}, {}",
                type_name, name
            );
        }

        Ok(rows.into_iter().next().map(Self::to_record))
    }

    async fn read_all_records(&self) -> Result<Vec<DbRecord>> {
        let rows = metric::Entity::find()
            .find_also_related(metric_type::Entity)
            .order_by_asc(metric::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    async fn close(&self) -> Result<()> {
        self.close_connection().await
    }
}
