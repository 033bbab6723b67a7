use async_trait::async_trait;

use super::model::Subscription;
use crate::shared::DomainResult;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Active plan by id
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Subscription>>;
}
