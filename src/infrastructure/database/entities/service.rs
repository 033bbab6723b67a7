//! Service entity (configurable line item of a service type)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_type_id: i32,
    pub name: String,
    /// Stable key ("bedrooms", "cleaners", "hours", ...)
    pub service_key: String,
    /// Unit cost in cents
    pub cost: i64,
    /// Minutes per unit
    pub time_duration: i32,
    /// "dropdown" or "range"
    pub input_type: String,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    /// "cleaner", "hours" or NULL
    pub relation_type: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_type::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_type::Column::Id"
    )]
    ServiceType,
}

impl Related<super::service_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
