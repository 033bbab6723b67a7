use async_trait::async_trait;

use super::model::User;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    /// Persist subscription id, start and expiry; other fields untouched
    async fn update_subscription_state(&self, user: &User) -> DomainResult<()>;
}
