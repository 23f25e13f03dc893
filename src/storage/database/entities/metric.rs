use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored metric value
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: Option<String>,

    pub type_id: Option<i32>,

    pub value: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::metric_type::Entity",
        from = "Column::TypeId",
        to = "super::metric_type::Column::Id"
    )]
    MetricType,
}

impl Related<super::metric_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MetricType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
