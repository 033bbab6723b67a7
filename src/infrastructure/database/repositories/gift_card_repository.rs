//! SeaORM implementation of GiftCardRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use crate::domain::gift_card::{GiftCard, GiftCardRepository, GiftCardUsage};
use crate::infrastructure::database::entities::{gift_card, gift_card_usage};
use crate::shared::money::from_cents;
use crate::shared::DomainResult;

pub(super) fn card_to_domain(m: gift_card::Model) -> GiftCard {
    GiftCard {
        id: m.id,
        code: m.code,
        original_amount: from_cents(m.original_amount),
        current_balance: from_cents(m.current_balance),
        is_active: m.is_active,
        is_paid: m.is_paid,
        purchaser_user_id: m.purchaser_user_id,
        recipient_email: m.recipient_email,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub(super) fn usage_to_domain(m: gift_card_usage::Model) -> GiftCardUsage {
    GiftCardUsage {
        id: m.id,
        gift_card_id: m.gift_card_id,
        order_id: m.order_id,
        user_id: m.user_id,
        amount_used: from_cents(m.amount_used),
        balance_before: from_cents(m.balance_before),
        balance_after: from_cents(m.balance_after),
        used_at: m.used_at,
    }
}

pub struct SeaOrmGiftCardRepository {
    db: DatabaseConnection,
}

impl SeaOrmGiftCardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GiftCardRepository for SeaOrmGiftCardRepository {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<GiftCard>> {
        let model = gift_card::Entity::find()
            .filter(gift_card::Column::Code.eq(GiftCard::normalize(code)))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(card_to_domain))
    }

    async fn find_usages(&self, gift_card_id: i32) -> DomainResult<Vec<GiftCardUsage>> {
        let models = gift_card_usage::Entity::find()
            .filter(gift_card_usage::Column::GiftCardId.eq(gift_card_id))
            .order_by_asc(gift_card_usage::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(usage_to_domain).collect())
    }
}
