use async_trait::async_trait;

use super::model::PromoCode;
use crate::shared::DomainResult;

#[async_trait]
pub trait PromoCodeRepository: Send + Sync {
    /// Lookup by normalized (upper-case) code, active or not
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<PromoCode>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PromoCode>>;
}
