//! SeaORM implementation of PromoCodeRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::db_err;
use crate::domain::promo::{DiscountType, PromoCode, PromoCodeRepository};
use crate::infrastructure::database::entities::promo_code;
use crate::shared::money::ratio_from_f64;
use crate::shared::DomainResult;

fn discount_type_to_domain(t: promo_code::DiscountType) -> DiscountType {
    match t {
        promo_code::DiscountType::Percentage => DiscountType::Percentage,
        promo_code::DiscountType::Flat => DiscountType::Flat,
    }
}

fn entity_to_domain(m: promo_code::Model) -> PromoCode {
    PromoCode {
        id: m.id,
        code: m.code,
        description: m.description,
        discount_type: discount_type_to_domain(m.discount_type),
        discount_value: ratio_from_f64(m.discount_value, Decimal::ZERO),
        valid_from: m.valid_from,
        valid_to: m.valid_to,
        max_usage_count: m.max_usage_count,
        max_usage_per_user: m.max_usage_per_user,
        current_usage_count: m.current_usage_count,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmPromoCodeRepository {
    db: DatabaseConnection,
}

impl SeaOrmPromoCodeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PromoCodeRepository for SeaOrmPromoCodeRepository {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<PromoCode>> {
        let model = promo_code::Entity::find()
            .filter(promo_code::Column::Code.eq(PromoCode::normalize(code)))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PromoCode>> {
        let model = promo_code::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }
}
