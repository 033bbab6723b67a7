//! Order entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Done")]
    Done,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

/// Order header. Money columns are cents.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub service_type_id: i32,
    /// Name at booking time
    pub service_type_name: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub apt_suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    pub service_date: NaiveDate,
    pub service_time: NaiveTime,
    pub entry_method: Option<String>,
    pub special_instructions: Option<String>,
    pub status: OrderStatus,

    pub sub_total: i64,
    pub tax: i64,
    pub tips: i64,
    pub discount_amount: i64,
    pub subscription_discount_amount: i64,
    pub gift_card_amount_used: i64,
    pub total: i64,

    pub total_duration: i32,
    pub maids_count: i32,

    pub promo_code: Option<String>,
    pub promo_code_id: Option<i32>,
    pub gift_card_code: Option<String>,
    pub subscription_id: Option<i32>,

    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::order_service::Entity")]
    Services,
    #[sea_orm(has_many = "super::order_extra_service::Entity")]
    ExtraServices,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::order_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::order_extra_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtraServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
