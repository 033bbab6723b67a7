//! SeaORM implementation of BookingUnitOfWork
//!
//! Every write of one booking runs on a single `DatabaseTransaction`.
//! Balance and usage counters are changed with guarded `UPDATE`s, so two
//! bookings racing on one gift card or promo code can never push them past
//! their limits: a guarded update that matches no row is a `Conflict` and
//! the booking rolls back. On SQLite the first write takes the database
//! write lock, which the transaction keeps until commit or rollback.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition,
    DatabaseTransaction, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info};

use super::db_err;
use super::gift_card_repository::card_to_domain;
use super::order_repository::{
    extra_line_to_active, order_to_active, order_to_domain, service_line_to_active,
};
use crate::domain::gift_card::{validate_gift_card, GiftCard, GiftCardUsage};
use crate::domain::order::Order;
use crate::domain::BookingUnitOfWork;
use crate::infrastructure::database::entities::{gift_card, gift_card_usage, order, promo_code};
use crate::shared::money::{from_cents, to_cents};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmBookingUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmBookingUnitOfWork {
    pub fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }

    async fn load_card(&self, code: &str) -> DomainResult<Option<gift_card::Model>> {
        gift_card::Entity::find()
            .filter(gift_card::Column::Code.eq(GiftCard::normalize(code)))
            .one(&self.txn)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl BookingUnitOfWork for SeaOrmBookingUnitOfWork {
    async fn insert_order(&mut self, o: &Order) -> DomainResult<Order> {
        let header = order_to_active(o)
            .insert(&self.txn)
            .await
            .map_err(db_err)?;

        let mut services = Vec::with_capacity(o.services.len());
        for line in &o.services {
            let model = service_line_to_active(header.id, line)
                .insert(&self.txn)
                .await
                .map_err(db_err)?;
            services.push(model);
        }

        let mut extras = Vec::with_capacity(o.extra_services.len());
        for line in &o.extra_services {
            let model = extra_line_to_active(header.id, line)
                .insert(&self.txn)
                .await
                .map_err(db_err)?;
            extras.push(model);
        }

        debug!(
            order_id = header.id,
            services = services.len(),
            extras = extras.len(),
            "Order rows inserted"
        );
        Ok(order_to_domain(header, services, extras))
    }

    async fn apply_gift_card(
        &mut self,
        code: &str,
        order_total: Decimal,
        order_id: i32,
        user_id: &str,
    ) -> DomainResult<Decimal> {
        let card = self.load_card(code).await?.map(card_to_domain);
        let validation = validate_gift_card(card.as_ref());
        let card = match card {
            Some(card) if validation.is_valid => card,
            // Drained by a concurrent booking after this one was priced
            Some(card) if card.is_active && card.is_paid => return Ok(Decimal::ZERO),
            _ => return Err(DomainError::Validation(validation.message)),
        };

        let amount = card.usable_amount(order_total);
        if amount <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let usage = debit_card(&self.txn, card, amount, order_id, user_id).await?;
        Ok(usage.amount_used)
    }

    async fn update_order_totals(
        &mut self,
        order_id: i32,
        gift_card_amount_used: Decimal,
        total: Decimal,
    ) -> DomainResult<()> {
        let result = order::Entity::update_many()
            .col_expr(
                order::Column::GiftCardAmountUsed,
                Expr::value(to_cents(gift_card_amount_used)),
            )
            .col_expr(order::Column::Total, Expr::value(to_cents(total)))
            .filter(order::Column::Id.eq(order_id))
            .exec(&self.txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Order", "id", order_id));
        }
        Ok(())
    }

    async fn increment_promo_usage(&mut self, promo_code_id: i32) -> DomainResult<()> {
        let result = promo_code::Entity::update_many()
            .col_expr(
                promo_code::Column::CurrentUsageCount,
                Expr::col(promo_code::Column::CurrentUsageCount).add(1),
            )
            .col_expr(promo_code::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(promo_code::Column::Id.eq(promo_code_id))
            .filter(
                Condition::any()
                    .add(promo_code::Column::MaxUsageCount.is_null())
                    .add(
                        Expr::col(promo_code::Column::CurrentUsageCount)
                            .lt(Expr::col(promo_code::Column::MaxUsageCount)),
                    ),
            )
            .exec(&self.txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::Conflict(
                "Promo code usage limit reached".to_string(),
            ));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await.map_err(db_err)
    }
}

/// Debit `amount` from `card` and append the ledger row.
///
/// `card` may be stale: the guarded update checks the live balance, and the
/// ledger's `balance_before` is read back from the row we just wrote.
async fn debit_card(
    txn: &DatabaseTransaction,
    mut card: GiftCard,
    amount: Decimal,
    order_id: i32,
    user_id: &str,
) -> DomainResult<GiftCardUsage> {
    let cents = to_cents(amount);

    let result = gift_card::Entity::update_many()
        .col_expr(
            gift_card::Column::CurrentBalance,
            Expr::col(gift_card::Column::CurrentBalance).sub(cents),
        )
        .col_expr(gift_card::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(gift_card::Column::Id.eq(card.id))
        .filter(gift_card::Column::CurrentBalance.gte(cents))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if result.rows_affected == 0 {
        return Err(DomainError::Conflict(format!(
            "Gift card {} balance changed during checkout",
            card.code
        )));
    }

    // Read back inside the same transaction, which still holds the write lock.
    let after = gift_card::Entity::find_by_id(card.id)
        .one(txn)
        .await
        .map_err(db_err)?
        .map(|m| m.current_balance)
        .ok_or_else(|| DomainError::not_found("GiftCard", "id", card.id))?;
    card.current_balance = from_cents(after + cents);

    let usage = card.debit(amount, order_id, user_id, Utc::now())?;
    gift_card_usage::ActiveModel {
        id: NotSet,
        gift_card_id: Set(usage.gift_card_id),
        order_id: Set(usage.order_id),
        user_id: Set(usage.user_id.clone()),
        amount_used: Set(to_cents(usage.amount_used)),
        balance_before: Set(to_cents(usage.balance_before)),
        balance_after: Set(to_cents(usage.balance_after)),
        used_at: Set(usage.used_at),
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    info!(
        gift_card_id = card.id,
        order_id,
        amount = %usage.amount_used,
        balance_after = %usage.balance_after,
        "Gift card debited"
    );
    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{ContactInfo, OrderStatus, ServiceAddress};
    use crate::infrastructure::database::entities::user;
    use crate::infrastructure::database::{init_database, run_migrations, DatabaseConfig};
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm::{DatabaseConnection, PaginatorTrait, TransactionTrait};

    async fn setup(balance_cents: i64) -> (DatabaseConnection, i32) {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();

        let now = Utc::now();
        user::ActiveModel {
            id: Set("u1".into()),
            email: Set("u1@example.com".into()),
            first_name: Set("Test".into()),
            last_name: Set("User".into()),
            role: Set(user::UserRole::Customer),
            is_active: Set(true),
            subscription_id: Set(None),
            subscription_start_date: Set(None),
            subscription_expiry_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        let card = gift_card::ActiveModel {
            id: NotSet,
            code: Set("LOCK-TEST-0001".into()),
            original_amount: Set(balance_cents),
            current_balance: Set(balance_cents),
            is_active: Set(true),
            is_paid: Set(true),
            purchaser_user_id: Set(None),
            recipient_email: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();
        (db, card.id)
    }

    fn pending_order() -> Order {
        let now = Utc::now();
        Order {
            id: 0,
            user_id: "u1".into(),
            service_type_id: 1,
            service_type_name: "Standard Cleaning".into(),
            contact: ContactInfo::default(),
            address: ServiceAddress::default(),
            service_date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
            service_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            entry_method: None,
            special_instructions: None,
            status: OrderStatus::Pending,
            sub_total: Decimal::new(100, 0),
            tax: Decimal::ZERO,
            tips: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            subscription_discount_amount: Decimal::ZERO,
            gift_card_amount_used: Decimal::ZERO,
            total: Decimal::new(100, 0),
            total_duration: 60,
            maids_count: 1,
            promo_code: None,
            promo_code_id: None,
            gift_card_code: None,
            subscription_id: None,
            is_paid: false,
            paid_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            services: Vec::new(),
            extra_services: Vec::new(),
        }
    }

    /// Another booking takes `cents` from the card inside `txn`.
    async fn spend_elsewhere(txn: &DatabaseTransaction, card_id: i32, cents: i64) {
        gift_card::Entity::update_many()
            .col_expr(
                gift_card::Column::CurrentBalance,
                Expr::col(gift_card::Column::CurrentBalance).sub(cents),
            )
            .filter(gift_card::Column::Id.eq(card_id))
            .exec(txn)
            .await
            .unwrap();
    }

    async fn stale_card(txn: &DatabaseTransaction, card_id: i32) -> GiftCard {
        gift_card::Entity::find_by_id(card_id)
            .one(txn)
            .await
            .unwrap()
            .map(card_to_domain)
            .unwrap()
    }

    #[tokio::test]
    async fn debit_against_drained_balance_is_a_conflict() {
        let (db, card_id) = setup(10_000).await;

        let mut uow = SeaOrmBookingUnitOfWork::new(db.begin().await.unwrap());
        let order = uow.insert_order(&pending_order()).await.unwrap();
        let card = stale_card(&uow.txn, card_id).await;
        spend_elsewhere(&uow.txn, card_id, 10_000).await;

        let err = debit_card(&uow.txn, card, Decimal::new(50, 0), order.id, "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let usages = gift_card_usage::Entity::find().count(&uow.txn).await.unwrap();
        assert_eq!(usages, 0);
        Box::new(uow).rollback().await.unwrap();

        let card = gift_card::Entity::find_by_id(card_id).one(&db).await.unwrap().unwrap();
        assert_eq!(card.current_balance, 10_000);
    }

    #[tokio::test]
    async fn ledger_uses_live_balance_not_the_stale_read() {
        let (db, card_id) = setup(10_000).await;

        let mut uow = SeaOrmBookingUnitOfWork::new(db.begin().await.unwrap());
        let order = uow.insert_order(&pending_order()).await.unwrap();
        let card = stale_card(&uow.txn, card_id).await;
        spend_elsewhere(&uow.txn, card_id, 2_000).await;

        let usage = debit_card(&uow.txn, card, Decimal::new(50, 0), order.id, "u1")
            .await
            .unwrap();
        assert_eq!(usage.balance_before, Decimal::new(80, 0));
        assert_eq!(usage.balance_after, Decimal::new(30, 0));
        Box::new(uow).commit().await.unwrap();

        let stored = gift_card_usage::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(stored.balance_before, 8_000);
        assert_eq!(stored.balance_after, 3_000);
        let card = gift_card::Entity::find_by_id(card_id).one(&db).await.unwrap().unwrap();
        assert_eq!(card.current_balance, 3_000);
    }
}
