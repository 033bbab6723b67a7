//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use crate::domain::catalog::{
    CatalogRepository, ExtraServiceDef, InputType, RelationType, ServiceDef, ServiceTypeDef,
};
use crate::infrastructure::database::entities::{extra_service, service, service_type};
use crate::shared::money::{from_cents, ratio_from_f64};
use crate::shared::DomainResult;

// ── Conversion helpers ──────────────────────────────────────────

fn service_type_to_domain(m: service_type::Model) -> ServiceTypeDef {
    ServiceTypeDef {
        id: m.id,
        name: m.name,
        base_price: from_cents(m.base_price),
        display_order: m.display_order,
        is_active: m.is_active,
    }
}

fn service_to_domain(m: service::Model) -> ServiceDef {
    ServiceDef {
        id: m.id,
        service_type_id: m.service_type_id,
        name: m.name,
        service_key: m.service_key,
        cost: from_cents(m.cost),
        time_duration: m.time_duration,
        input_type: InputType::parse(&m.input_type),
        min_value: m.min_value,
        max_value: m.max_value,
        relation_type: RelationType::parse(m.relation_type.as_deref()),
        display_order: m.display_order,
        is_active: m.is_active,
    }
}

fn extra_to_domain(m: extra_service::Model) -> ExtraServiceDef {
    ExtraServiceDef {
        id: m.id,
        service_type_id: m.service_type_id,
        name: m.name,
        price: from_cents(m.price),
        duration: m.duration,
        has_quantity: m.has_quantity,
        has_hours: m.has_hours,
        is_deep_cleaning: m.is_deep_cleaning,
        is_super_deep_cleaning: m.is_super_deep_cleaning,
        is_same_day_service: m.is_same_day_service,
        price_multiplier: ratio_from_f64(m.price_multiplier, Decimal::ONE),
        is_active: m.is_active,
    }
}

// ── SeaOrmCatalogRepository ─────────────────────────────────────

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn find_service_type(&self, id: i32) -> DomainResult<Option<ServiceTypeDef>> {
        let model = service_type::Entity::find_by_id(id)
            .filter(service_type::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(service_type_to_domain))
    }

    async fn find_service(&self, id: i32) -> DomainResult<Option<ServiceDef>> {
        let model = service::Entity::find_by_id(id)
            .filter(service::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(service_to_domain))
    }

    async fn find_extra_service(&self, id: i32) -> DomainResult<Option<ExtraServiceDef>> {
        let model = extra_service::Entity::find_by_id(id)
            .filter(extra_service::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(extra_to_domain))
    }

    async fn find_services_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<ServiceDef>> {
        let models = service::Entity::find()
            .filter(service::Column::Id.is_in(ids.iter().copied()))
            .filter(service::Column::IsActive.eq(true))
            .order_by_asc(service::Column::DisplayOrder)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(service_to_domain).collect())
    }

    async fn find_extra_services_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<ExtraServiceDef>> {
        let models = extra_service::Entity::find()
            .filter(extra_service::Column::Id.is_in(ids.iter().copied()))
            .filter(extra_service::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(extra_to_domain).collect())
    }
}
