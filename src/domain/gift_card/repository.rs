use async_trait::async_trait;

use super::model::{GiftCard, GiftCardUsage};
use crate::shared::DomainResult;

/// Read side of the gift-card ledger. Debits happen only inside
/// [`crate::domain::BookingUnitOfWork::apply_gift_card`].
#[async_trait]
pub trait GiftCardRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<GiftCard>>;
    /// Ledger rows of one card, oldest first
    async fn find_usages(&self, gift_card_id: i32) -> DomainResult<Vec<GiftCardUsage>>;
}
