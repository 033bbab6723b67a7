//! Order repository interface

use async_trait::async_trait;

use super::model::Order;
use crate::shared::DomainResult;

/// Reads and lifecycle updates of committed orders.
///
/// Orders are created only through [`crate::domain::BookingUnitOfWork`].
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Order with its line items
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>>;
    /// Orders of one user, newest first, without line items
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Order>>;
    /// Persist status, payment and cancellation fields. Monetary fields are never rewritten.
    async fn update_lifecycle(&self, order: &Order) -> DomainResult<()>;
    /// Non-cancelled orders of `user_id` that redeemed promo `promo_code_id`
    async fn count_promo_uses_by_user(&self, promo_code_id: i32, user_id: &str) -> DomainResult<u64>;
}
