//! Extra service entity (optional add-on)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extra_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// NULL = offered for every service type
    pub service_type_id: Option<i32>,
    pub name: String,
    /// Price in cents
    pub price: i64,
    /// Minutes
    pub duration: i32,
    pub has_quantity: bool,
    pub has_hours: bool,
    pub is_deep_cleaning: bool,
    pub is_super_deep_cleaning: bool,
    pub is_same_day_service: bool,
    pub price_multiplier: f64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
