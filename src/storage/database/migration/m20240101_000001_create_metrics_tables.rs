use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetricTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetricTypes::Name).string().null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metrics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Metrics::Name).string().null())
                    .col(ColumnDef::new(Metrics::TypeId).integer().null())
                    .col(ColumnDef::new(Metrics::Value).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metrics_type_id")
                            .from(Metrics::Table, Metrics::TypeId)
                            .to(MetricTypes::Table, MetricTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_name_type_id")
                    .table(Metrics::Table)
                    .col(Metrics::Name)
                    .col(Metrics::TypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MetricTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MetricTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Metrics {
    Table,
    Id,
    Name,
    TypeId,
    Value,
}
