//! SeaORM implementation of OrderRepository

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::order::{
    ContactInfo, Order, OrderExtraServiceLine, OrderRepository, OrderServiceLine, OrderStatus,
    ServiceAddress,
};
use crate::infrastructure::database::entities::{order, order_extra_service, order_service};
use crate::shared::money::{from_cents, ratio_from_f64, ratio_to_f64, to_cents};
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn status_to_entity(s: OrderStatus) -> order::OrderStatus {
    match s {
        OrderStatus::Pending => order::OrderStatus::Pending,
        OrderStatus::Active => order::OrderStatus::Active,
        OrderStatus::Done => order::OrderStatus::Done,
        OrderStatus::Cancelled => order::OrderStatus::Cancelled,
    }
}

fn status_to_domain(s: order::OrderStatus) -> OrderStatus {
    match s {
        order::OrderStatus::Pending => OrderStatus::Pending,
        order::OrderStatus::Active => OrderStatus::Active,
        order::OrderStatus::Done => OrderStatus::Done,
        order::OrderStatus::Cancelled => OrderStatus::Cancelled,
    }
}

fn service_line_to_domain(m: order_service::Model) -> OrderServiceLine {
    OrderServiceLine {
        id: m.id,
        order_id: m.order_id,
        service_id: m.service_id,
        service_name: m.service_name,
        quantity: m.quantity,
        cost: from_cents(m.cost),
        duration: m.duration,
        price_multiplier: ratio_from_f64(m.price_multiplier, Decimal::ONE),
    }
}

fn extra_line_to_domain(m: order_extra_service::Model) -> OrderExtraServiceLine {
    OrderExtraServiceLine {
        id: m.id,
        order_id: m.order_id,
        extra_service_id: m.extra_service_id,
        extra_service_name: m.extra_service_name,
        quantity: m.quantity,
        hours: ratio_from_f64(m.hours, Decimal::ZERO),
        cost: from_cents(m.cost),
        duration: m.duration,
        price_multiplier: ratio_from_f64(m.price_multiplier, Decimal::ONE),
    }
}

pub(super) fn order_to_domain(
    m: order::Model,
    services: Vec<order_service::Model>,
    extras: Vec<order_extra_service::Model>,
) -> Order {
    Order {
        id: m.id,
        user_id: m.user_id,
        service_type_id: m.service_type_id,
        service_type_name: m.service_type_name,
        contact: ContactInfo {
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
        },
        address: ServiceAddress {
            address: m.address,
            apt_suite: m.apt_suite,
            city: m.city,
            state: m.state,
            zip_code: m.zip_code,
        },
        service_date: m.service_date,
        service_time: m.service_time,
        entry_method: m.entry_method,
        special_instructions: m.special_instructions,
        status: status_to_domain(m.status),
        sub_total: from_cents(m.sub_total),
        tax: from_cents(m.tax),
        tips: from_cents(m.tips),
        discount_amount: from_cents(m.discount_amount),
        subscription_discount_amount: from_cents(m.subscription_discount_amount),
        gift_card_amount_used: from_cents(m.gift_card_amount_used),
        total: from_cents(m.total),
        total_duration: m.total_duration,
        maids_count: m.maids_count,
        promo_code: m.promo_code,
        promo_code_id: m.promo_code_id,
        gift_card_code: m.gift_card_code,
        subscription_id: m.subscription_id,
        is_paid: m.is_paid,
        paid_at: m.paid_at,
        cancellation_reason: m.cancellation_reason,
        created_at: m.created_at,
        updated_at: m.updated_at,
        services: services.into_iter().map(service_line_to_domain).collect(),
        extra_services: extras.into_iter().map(extra_line_to_domain).collect(),
    }
}

pub(super) fn order_to_active(o: &Order) -> order::ActiveModel {
    order::ActiveModel {
        id: NotSet,
        user_id: Set(o.user_id.clone()),
        service_type_id: Set(o.service_type_id),
        service_type_name: Set(o.service_type_name.clone()),
        first_name: Set(o.contact.first_name.clone()),
        last_name: Set(o.contact.last_name.clone()),
        email: Set(o.contact.email.clone()),
        phone: Set(o.contact.phone.clone()),
        address: Set(o.address.address.clone()),
        apt_suite: Set(o.address.apt_suite.clone()),
        city: Set(o.address.city.clone()),
        state: Set(o.address.state.clone()),
        zip_code: Set(o.address.zip_code.clone()),
        service_date: Set(o.service_date),
        service_time: Set(o.service_time),
        entry_method: Set(o.entry_method.clone()),
        special_instructions: Set(o.special_instructions.clone()),
        status: Set(status_to_entity(o.status)),
        sub_total: Set(to_cents(o.sub_total)),
        tax: Set(to_cents(o.tax)),
        tips: Set(to_cents(o.tips)),
        discount_amount: Set(to_cents(o.discount_amount)),
        subscription_discount_amount: Set(to_cents(o.subscription_discount_amount)),
        gift_card_amount_used: Set(to_cents(o.gift_card_amount_used)),
        total: Set(to_cents(o.total)),
        total_duration: Set(o.total_duration),
        maids_count: Set(o.maids_count),
        promo_code: Set(o.promo_code.clone()),
        promo_code_id: Set(o.promo_code_id),
        gift_card_code: Set(o.gift_card_code.clone()),
        subscription_id: Set(o.subscription_id),
        is_paid: Set(o.is_paid),
        paid_at: Set(o.paid_at),
        cancellation_reason: Set(o.cancellation_reason.clone()),
        created_at: Set(o.created_at),
        updated_at: Set(o.updated_at),
    }
}

pub(super) fn service_line_to_active(order_id: i32, l: &OrderServiceLine) -> order_service::ActiveModel {
    order_service::ActiveModel {
        id: NotSet,
        order_id: Set(order_id),
        service_id: Set(l.service_id),
        service_name: Set(l.service_name.clone()),
        quantity: Set(l.quantity),
        cost: Set(to_cents(l.cost)),
        duration: Set(l.duration),
        price_multiplier: Set(ratio_to_f64(l.price_multiplier)),
    }
}

pub(super) fn extra_line_to_active(
    order_id: i32,
    l: &OrderExtraServiceLine,
) -> order_extra_service::ActiveModel {
    order_extra_service::ActiveModel {
        id: NotSet,
        order_id: Set(order_id),
        extra_service_id: Set(l.extra_service_id),
        extra_service_name: Set(l.extra_service_name.clone()),
        quantity: Set(l.quantity),
        hours: Set(ratio_to_f64(l.hours)),
        cost: Set(to_cents(l.cost)),
        duration: Set(l.duration),
        price_multiplier: Set(ratio_to_f64(l.price_multiplier)),
    }
}

// ── SeaOrmOrderRepository ───────────────────────────────────────

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>> {
        let Some(model) = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let services = order_service::Entity::find()
            .filter(order_service::Column::OrderId.eq(id))
            .order_by_asc(order_service::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let extras = order_extra_service::Entity::find()
            .filter(order_extra_service::Column::OrderId.eq(id))
            .order_by_asc(order_extra_service::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Some(order_to_domain(model, services, extras)))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models
            .into_iter()
            .map(|m| order_to_domain(m, Vec::new(), Vec::new()))
            .collect())
    }

    async fn update_lifecycle(&self, o: &Order) -> DomainResult<()> {
        let existing = order::Entity::find_by_id(o.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Order", "id", o.id));
        };

        let mut model: order::ActiveModel = existing.into();
        model.status = Set(status_to_entity(o.status));
        model.is_paid = Set(o.is_paid);
        model.paid_at = Set(o.paid_at);
        model.cancellation_reason = Set(o.cancellation_reason.clone());
        model.updated_at = Set(Utc::now());
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn count_promo_uses_by_user(&self, promo_code_id: i32, user_id: &str) -> DomainResult<u64> {
        order::Entity::find()
            .filter(order::Column::PromoCodeId.eq(promo_code_id))
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.ne(order::OrderStatus::Cancelled))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
