//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::catalog::CatalogRepository;
use crate::domain::gift_card::GiftCardRepository;
use crate::domain::order::OrderRepository;
use crate::domain::promo::PromoCodeRepository;
use crate::domain::repositories::{BookingUnitOfWork, RepositoryProvider};
use crate::domain::subscription::SubscriptionRepository;
use crate::domain::user::UserRepository;
use crate::shared::DomainResult;

use super::booking_unit_of_work::SeaOrmBookingUnitOfWork;
use super::catalog_repository::SeaOrmCatalogRepository;
use super::db_err;
use super::gift_card_repository::SeaOrmGiftCardRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::promo_code_repository::SeaOrmPromoCodeRepository;
use super::subscription_repository::SeaOrmSubscriptionRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let order = repos.orders().find_by_id(42).await?;
/// let card = repos.gift_cards().find_by_code("ABCD-EFGH-2345").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    catalog: SeaOrmCatalogRepository,
    orders: SeaOrmOrderRepository,
    promo_codes: SeaOrmPromoCodeRepository,
    gift_cards: SeaOrmGiftCardRepository,
    subscriptions: SeaOrmSubscriptionRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            catalog: SeaOrmCatalogRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db.clone()),
            promo_codes: SeaOrmPromoCodeRepository::new(db.clone()),
            gift_cards: SeaOrmGiftCardRepository::new(db.clone()),
            subscriptions: SeaOrmSubscriptionRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db.clone()),
            db,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn promo_codes(&self) -> &dyn PromoCodeRepository {
        &self.promo_codes
    }

    fn gift_cards(&self) -> &dyn GiftCardRepository {
        &self.gift_cards
    }

    fn subscriptions(&self) -> &dyn SubscriptionRepository {
        &self.subscriptions
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn begin_booking(&self) -> DomainResult<Box<dyn BookingUnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmBookingUnitOfWork::new(txn)))
    }
}
