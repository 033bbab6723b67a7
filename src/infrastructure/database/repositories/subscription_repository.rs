//! SeaORM implementation of SubscriptionRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::db_err;
use crate::domain::subscription::{Subscription, SubscriptionRepository};
use crate::infrastructure::database::entities::subscription;
use crate::shared::money::ratio_from_f64;
use crate::shared::DomainResult;

fn entity_to_domain(m: subscription::Model) -> Subscription {
    Subscription {
        id: m.id,
        name: m.name,
        discount_percentage: ratio_from_f64(m.discount_percentage, Decimal::ZERO),
        subscription_days: m.subscription_days,
        is_active: m.is_active,
    }
}

pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Subscription>> {
        let model = subscription::Entity::find_by_id(id)
            .filter(subscription::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }
}
