//! Gift card ledger row (append-only)

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gift_card_usages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub gift_card_id: i32,
    pub order_id: i32,
    pub user_id: String,
    /// Cents
    pub amount_used: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    pub used_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gift_card::Entity",
        from = "Column::GiftCardId",
        to = "super::gift_card::Column::Id"
    )]
    GiftCard,
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::gift_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GiftCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
