//! Catalog reader interface

use async_trait::async_trait;

use super::model::{ExtraServiceDef, ServiceDef, ServiceTypeDef};
use crate::shared::DomainResult;

/// Read-only access to the active catalog.
///
/// Inactive entries are never returned.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_service_type(&self, id: i32) -> DomainResult<Option<ServiceTypeDef>>;
    async fn find_service(&self, id: i32) -> DomainResult<Option<ServiceDef>>;
    async fn find_extra_service(&self, id: i32) -> DomainResult<Option<ExtraServiceDef>>;
    async fn find_services_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<ServiceDef>>;
    async fn find_extra_services_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<ExtraServiceDef>>;
}
