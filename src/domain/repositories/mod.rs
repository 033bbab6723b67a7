//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `BookingUnitOfWork`: the single database transaction a booking runs in

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::catalog::CatalogRepository;
use super::gift_card::GiftCardRepository;
use super::order::{Order, OrderRepository};
use super::promo::PromoCodeRepository;
use super::subscription::SubscriptionRepository;
use super::user::UserRepository;
use crate::shared::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let order = repos.orders().find_by_id(42).await?;
///     let mut uow = repos.begin_booking().await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn catalog(&self) -> &dyn CatalogRepository;
    fn orders(&self) -> &dyn OrderRepository;
    fn promo_codes(&self) -> &dyn PromoCodeRepository;
    fn gift_cards(&self) -> &dyn GiftCardRepository;
    fn subscriptions(&self) -> &dyn SubscriptionRepository;
    fn users(&self) -> &dyn UserRepository;

    /// Open the transaction a booking is persisted in
    async fn begin_booking(&self) -> DomainResult<Box<dyn BookingUnitOfWork>>;
}

// ── BookingUnitOfWork ───────────────────────────────────────────

/// Writes of one booking, all inside one database transaction.
///
/// Dropping the unit of work without `commit` rolls everything back.
#[async_trait]
pub trait BookingUnitOfWork: Send {
    /// Insert header and line items; returns the order with assigned ids
    async fn insert_order(&mut self, order: &Order) -> DomainResult<Order>;

    /// Debit up to `order_total` from the card and append a ledger row.
    ///
    /// The read-subtract-write is atomic per card. Returns the amount
    /// actually debited, which the balance may have clamped.
    async fn apply_gift_card(
        &mut self,
        code: &str,
        order_total: Decimal,
        order_id: i32,
        user_id: &str,
    ) -> DomainResult<Decimal>;

    async fn update_order_totals(
        &mut self,
        order_id: i32,
        gift_card_amount_used: Decimal,
        total: Decimal,
    ) -> DomainResult<()>;

    async fn increment_promo_usage(&mut self, promo_code_id: i32) -> DomainResult<()>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
