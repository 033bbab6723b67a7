//! Booking service: quoting, the transactional booking flow, and the
//! order lifecycle operations around it

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{BookingError, BookingStage};
use super::request::{Actor, BookingRequest, Quote, QuoteRequest};
use crate::application::pricing::{
    assemble, resolve_discounts, DiscountSources, DurationDiscrepancy, PricingPolicy,
};
use crate::application::subscriptions::{SubscriptionEffect, SubscriptionManager};
use crate::domain::audit::AuditSink;
use crate::domain::catalog::CatalogSnapshot;
use crate::domain::gift_card::{validate_gift_card, GiftCard, GiftCardValidation};
use crate::domain::order::{Order, OrderExtraServiceLine, OrderServiceLine, OrderStatus};
use crate::domain::promo::{validate_promo, PromoCode, PromoValidation};
use crate::domain::{BookingUnitOfWork, DiscountCode, RepositoryProvider};
use crate::shared::money::round_money;
use crate::shared::{DomainError, DomainResult};

/// Effects that run after the booking transaction committed
#[derive(Debug, Clone, PartialEq)]
pub struct PostCommitOutcome {
    pub subscription: Option<SubscriptionEffect>,
}

impl PostCommitOutcome {
    pub fn warnings(&self) -> Vec<String> {
        self.subscription
            .iter()
            .filter_map(|e| e.warning())
            .map(|w| format!("Subscription was not updated: {}", w))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub order: Order,
    /// Opaque reference for the simulated payment step
    pub payment_handle: String,
    pub discrepancy: Option<DurationDiscrepancy>,
    pub post_commit: PostCommitOutcome,
}

#[derive(Debug, Clone)]
pub struct PromoCheck {
    pub validation: PromoValidation,
    /// Discount against the supplied subtotal, when one was supplied
    pub discount_amount: Option<Decimal>,
    pub is_gift_card: bool,
}

#[derive(Debug, Clone)]
pub struct GiftCardPreview {
    pub validation: GiftCardValidation,
    pub amount_to_apply: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub order: Order,
    pub subscription: Option<SubscriptionEffect>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    subscriptions: SubscriptionManager,
    audit: Arc<dyn AuditSink>,
    policy: PricingPolicy,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        audit: Arc<dyn AuditSink>,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            subscriptions: SubscriptionManager::new(repos.clone()),
            repos,
            audit,
            policy,
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    // ── Quoting ─────────────────────────────────────────────────

    /// Price a cart without persisting anything
    pub async fn calculate(&self, req: &QuoteRequest) -> DomainResult<Quote> {
        let snapshot = self.load_snapshot(req).await?;
        let totals = assemble(&snapshot, &req.cart, &self.policy)?;

        let promo = match req.discount.as_ref().and_then(DiscountCode::promo) {
            Some(code) => Some(self.usable_promo(code, &req.user_id).await?),
            None => None,
        };
        let gift_card = match req.discount.as_ref().and_then(DiscountCode::gift_card) {
            Some(code) => Some(self.usable_gift_card(code).await?),
            None => None,
        };
        let subscription = match req.subscription_id {
            Some(id) => Some(
                self.repos
                    .subscriptions()
                    .find_by_id(id)
                    .await?
                    .filter(|s| s.is_active)
                    .ok_or_else(|| DomainError::not_found("Subscription", "id", id))?,
            ),
            None => None,
        };

        if req.tips < Decimal::ZERO {
            return Err(DomainError::Validation("Tips cannot be negative".into()));
        }

        let breakdown = resolve_discounts(
            totals.sub_total,
            req.tips,
            DiscountSources {
                promo: promo.as_ref(),
                subscription: subscription.as_ref(),
                gift_card_balance: gift_card.as_ref().map(|g| g.current_balance),
            },
            &self.policy,
        )?;

        Ok(Quote {
            service_type_name: snapshot.service_type.name.clone(),
            totals,
            breakdown,
            promo,
            gift_card,
            subscription,
        })
    }

    /// Catalog read model of everything the cart references, fetched once
    async fn load_snapshot(&self, req: &QuoteRequest) -> DomainResult<CatalogSnapshot> {
        let catalog = self.repos.catalog();
        let service_type = catalog
            .find_service_type(req.service_type_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceType", "id", req.service_type_id))?;

        let service_ids: Vec<i32> = unique(req.cart.services.iter().map(|s| s.service_id));
        let extra_ids: Vec<i32> = unique(req.cart.extras.iter().map(|e| e.extra_service_id));

        let services = if service_ids.is_empty() {
            Vec::new()
        } else {
            catalog.find_services_by_ids(&service_ids).await?
        };
        let extras = if extra_ids.is_empty() {
            Vec::new()
        } else {
            catalog.find_extra_services_by_ids(&extra_ids).await?
        };
        for extra in &extras {
            extra.validate_flags()?;
        }

        // Missing ids surface as NotFound from the snapshot lookups
        Ok(CatalogSnapshot::new(service_type, services, extras))
    }

    async fn check_promo(&self, code: &str, user_id: &str) -> DomainResult<(Option<PromoCode>, PromoValidation)> {
        let promo = self
            .repos
            .promo_codes()
            .find_by_code(&PromoCode::normalize(code))
            .await?;
        let uses = match &promo {
            Some(p) if p.max_usage_per_user.is_some() => {
                self.repos.orders().count_promo_uses_by_user(p.id, user_id).await?
            }
            _ => 0,
        };
        let validation = validate_promo(promo.as_ref(), Utc::now(), uses);
        Ok((promo, validation))
    }

    async fn usable_promo(&self, code: &str, user_id: &str) -> DomainResult<PromoCode> {
        match self.check_promo(code, user_id).await? {
            (Some(promo), v) if v.is_valid => Ok(promo),
            (_, v) => Err(DomainError::Validation(v.message)),
        }
    }

    async fn usable_gift_card(&self, code: &str) -> DomainResult<GiftCard> {
        let card = self
            .repos
            .gift_cards()
            .find_by_code(&GiftCard::normalize(code))
            .await?;
        let validation = validate_gift_card(card.as_ref());
        match card {
            Some(card) if validation.is_valid => Ok(card),
            _ => Err(DomainError::Validation(validation.message)),
        }
    }

    /// Validate a code typed into the promo field. Never an error for an
    /// unusable code; `is_valid = false` carries the reason.
    pub async fn validate_promo(
        &self,
        raw_code: &str,
        user_id: &str,
        sub_total: Option<Decimal>,
    ) -> DomainResult<PromoCheck> {
        match DiscountCode::classify(raw_code) {
            None => Ok(PromoCheck {
                validation: PromoValidation {
                    is_valid: false,
                    message: "Promo code is required".to_string(),
                    promo_code_id: None,
                    discount_type: None,
                    discount_value: Decimal::ZERO,
                },
                discount_amount: None,
                is_gift_card: false,
            }),
            Some(DiscountCode::GiftCard(_)) => Ok(PromoCheck {
                validation: PromoValidation {
                    is_valid: false,
                    message: "This is a gift card code, apply it as a gift card".to_string(),
                    promo_code_id: None,
                    discount_type: None,
                    discount_value: Decimal::ZERO,
                },
                discount_amount: None,
                is_gift_card: true,
            }),
            Some(DiscountCode::Promo(code)) => {
                let (promo, validation) = self.check_promo(&code, user_id).await?;
                let discount_amount = match (&promo, sub_total) {
                    (Some(p), Some(sub_total)) if validation.is_valid => {
                        Some(p.discount_for(round_money(sub_total)))
                    }
                    _ => None,
                };
                Ok(PromoCheck {
                    validation,
                    discount_amount,
                    is_gift_card: false,
                })
            }
        }
    }

    /// Preview a gift card against an order total; debits nothing
    pub async fn preview_gift_card(&self, code: &str, order_total: Decimal) -> DomainResult<GiftCardPreview> {
        let card = self
            .repos
            .gift_cards()
            .find_by_code(&GiftCard::normalize(code))
            .await?;
        let validation = validate_gift_card(card.as_ref());
        let (amount_to_apply, remaining_balance) = match &card {
            Some(card) if validation.is_valid => {
                let amount = round_money(card.usable_amount(order_total));
                (amount, card.current_balance - amount)
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };
        Ok(GiftCardPreview {
            validation,
            amount_to_apply,
            remaining_balance,
        })
    }

    // ── Booking transaction ─────────────────────────────────────

    /// Validate, then persist order, promo usage and gift-card debit in
    /// one transaction, then run post-commit effects.
    pub async fn create_booking(&self, req: BookingRequest) -> Result<BookingOutcome, BookingError> {
        let user_id = req.quote.user_id.clone();

        let quote = match self.validate_booking(&req).await {
            Ok(quote) => quote,
            Err(e) => {
                record_failure(BookingStage::Validating);
                info!(user_id = %user_id, reason = %e, "Booking rejected");
                return Err(BookingError::Rejected(e));
            }
        };

        let now = Utc::now();
        let draft = build_order(&req, &quote, now);

        let mut uow = self.repos.begin_booking().await.map_err(|source| {
            record_failure(BookingStage::Persisting);
            BookingError::Failed {
                stage: BookingStage::Persisting,
                source,
            }
        })?;

        let order = match self.persist(uow.as_mut(), &draft, &quote).await {
            Ok(order) => order,
            Err((stage, source)) => {
                if let Err(e) = uow.rollback().await {
                    warn!(user_id = %user_id, error = %e, "Rollback failed");
                }
                record_failure(stage);
                warn!(user_id = %user_id, stage = %stage, error = %source, "Booking transaction rolled back");
                return Err(BookingError::Failed { stage, source });
            }
        };

        if let Err(source) = uow.commit().await {
            record_failure(BookingStage::Committing);
            warn!(user_id = %user_id, error = %source, "Booking commit failed");
            return Err(BookingError::Failed {
                stage: BookingStage::Committing,
                source,
            });
        }

        metrics::counter!("bookings_created_total").increment(1);
        if order.gift_card_amount_used > Decimal::ZERO {
            metrics::counter!("gift_card_debits_total").increment(1);
        }
        if quote.totals.discrepancy.is_some() {
            metrics::counter!("duration_discrepancies_total").increment(1);
        }
        info!(
            order_id = order.id,
            user_id = %user_id,
            sub_total = %order.sub_total,
            total = %order.total,
            gift_card_used = %order.gift_card_amount_used,
            "Booking committed"
        );

        let post_commit = self.run_post_commit(&order, &quote).await;
        self.audit
            .log_create("Order", order.id.to_string(), Some(&order.user_id), order_snapshot(&order));
        debug!(
            order_id = order.id,
            stage = %BookingStage::Done,
            warnings = post_commit.warnings().len(),
            "Booking finished"
        );

        Ok(BookingOutcome {
            payment_handle: format!("pay_{}_{}", order.id, Uuid::new_v4().simple()),
            discrepancy: quote.totals.discrepancy,
            order,
            post_commit,
        })
    }

    async fn validate_booking(&self, req: &BookingRequest) -> DomainResult<Quote> {
        if req.service_date < Utc::now().date_naive() {
            return Err(DomainError::Validation(
                "Service date cannot be in the past".into(),
            ));
        }
        if req.contact.email.trim().is_empty() {
            return Err(DomainError::Validation("Contact email is required".into()));
        }
        let user_id = &req.quote.user_id;
        match self.repos.users().find_by_id(user_id).await? {
            Some(user) if user.is_active => {}
            Some(_) => return Err(DomainError::Forbidden("User account is disabled".into())),
            None => return Err(DomainError::not_found("User", "id", user_id)),
        }
        self.calculate(&req.quote).await
    }

    async fn persist(
        &self,
        uow: &mut dyn BookingUnitOfWork,
        draft: &Order,
        quote: &Quote,
    ) -> Result<Order, (BookingStage, DomainError)> {
        let mut order = uow
            .insert_order(draft)
            .await
            .map_err(|e| (BookingStage::Persisting, e))?;

        if let Some(promo_id) = order.promo_code_id {
            uow.increment_promo_usage(promo_id)
                .await
                .map_err(|e| (BookingStage::Persisting, e))?;
        }

        if let Some(card) = &quote.gift_card {
            if quote.breakdown.gift_card_amount_used > Decimal::ZERO {
                let used = uow
                    .apply_gift_card(
                        &card.code,
                        quote.breakdown.total_before_gift_card,
                        order.id,
                        &order.user_id,
                    )
                    .await
                    .map_err(|e| (BookingStage::ApplyingGiftCard, e))?;
                let breakdown = quote.breakdown.with_gift_card_used(used);
                uow.update_order_totals(order.id, breakdown.gift_card_amount_used, breakdown.total)
                    .await
                    .map_err(|e| (BookingStage::ApplyingGiftCard, e))?;
                order.gift_card_amount_used = breakdown.gift_card_amount_used;
                order.total = breakdown.total;
            }
        }

        Ok(order)
    }

    async fn run_post_commit(&self, order: &Order, quote: &Quote) -> PostCommitOutcome {
        let subscription = match &quote.subscription {
            Some(plan) if plan.grants_window() => {
                let effect = self
                    .subscriptions
                    .apply_after_booking(&order.user_id, plan.id)
                    .await;
                if let Some(reason) = effect.warning() {
                    warn!(
                        order_id = order.id,
                        subscription_id = plan.id,
                        stage = %BookingStage::CommittingSubscription,
                        reason,
                        "Subscription update failed after booking"
                    );
                }
                Some(effect)
            }
            _ => None,
        };
        PostCommitOutcome { subscription }
    }

    // ── Order lifecycle ─────────────────────────────────────────

    pub async fn get_order(&self, actor: &Actor, order_id: i32) -> DomainResult<Order> {
        let order = self
            .repos
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", order_id))?;
        if !actor.is_admin() && !order.is_owned_by(&actor.user_id) {
            return Err(DomainError::Forbidden("Order belongs to another user".into()));
        }
        Ok(order)
    }

    pub async fn list_orders(&self, actor: &Actor) -> DomainResult<Vec<Order>> {
        self.repos.orders().find_by_user(&actor.user_id).await
    }

    /// Stubbed payment capture: marks the order paid and makes sure the
    /// order's subscription is active on the user.
    pub async fn simulate_payment(&self, actor: &Actor, order_id: i32) -> DomainResult<PaymentOutcome> {
        let mut order = self.get_order(actor, order_id).await?;
        if !order.is_owned_by(&actor.user_id) {
            return Err(DomainError::Forbidden("Only the owner can pay for an order".into()));
        }
        let before = order_snapshot(&order);
        order.mark_paid(Utc::now())?;
        self.repos.orders().update_lifecycle(&order).await?;
        info!(order_id, user_id = %actor.user_id, total = %order.total, "Payment simulated");

        let subscription = match order.subscription_id {
            Some(subscription_id) => {
                let effect = self
                    .subscriptions
                    .ensure_active(&order.user_id, subscription_id)
                    .await;
                if let Some(reason) = effect.warning() {
                    warn!(order_id, subscription_id, reason, "Subscription activation failed after payment");
                }
                Some(effect)
            }
            None => None,
        };

        self.audit.log_update(
            "Order",
            order.id.to_string(),
            Some(&actor.user_id),
            Some(before),
            order_snapshot(&order),
        );
        Ok(PaymentOutcome { order, subscription })
    }

    pub async fn cancel_order(&self, actor: &Actor, order_id: i32, reason: &str) -> DomainResult<Order> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::Validation("Cancellation reason is required".into()));
        }
        let mut order = self.get_order(actor, order_id).await?;
        let before = order_snapshot(&order);
        order.cancel(reason, Utc::now())?;
        self.repos.orders().update_lifecycle(&order).await?;
        info!(order_id, user_id = %actor.user_id, "Order cancelled");

        self.audit.log_update(
            "Order",
            order.id.to_string(),
            Some(&actor.user_id),
            Some(before),
            order_snapshot(&order),
        );
        Ok(order)
    }
}

fn unique(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn record_failure(stage: BookingStage) {
    metrics::counter!("booking_failures_total", "stage" => stage.as_str()).increment(1);
}

/// Order as inserted: gift card amount is a placeholder until the ledger
/// debit inside the transaction reports the real figure.
fn build_order(req: &BookingRequest, quote: &Quote, now: DateTime<Utc>) -> Order {
    let b = &quote.breakdown;
    let totals = &quote.totals;
    Order {
        id: 0,
        user_id: req.quote.user_id.clone(),
        service_type_id: req.quote.service_type_id,
        service_type_name: quote.service_type_name.clone(),
        contact: req.contact.clone(),
        address: req.address.clone(),
        service_date: req.service_date,
        service_time: req.service_time,
        entry_method: req.entry_method.clone(),
        special_instructions: req.special_instructions.clone(),
        status: OrderStatus::Pending,
        sub_total: b.sub_total,
        tax: b.tax,
        tips: b.tips,
        discount_amount: b.discount_amount,
        subscription_discount_amount: b.subscription_discount_amount,
        gift_card_amount_used: Decimal::ZERO,
        total: b.total_before_gift_card,
        total_duration: totals.total_duration,
        maids_count: totals.maids_count,
        promo_code: quote.promo.as_ref().map(|p| p.code.clone()),
        promo_code_id: quote.promo.as_ref().map(|p| p.id),
        gift_card_code: quote.gift_card.as_ref().map(|g| g.code.clone()),
        subscription_id: quote.subscription.as_ref().map(|s| s.id),
        is_paid: false,
        paid_at: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        services: totals
            .services
            .iter()
            .map(|l| OrderServiceLine {
                id: 0,
                order_id: 0,
                service_id: l.service_id,
                service_name: l.service_name.clone(),
                quantity: l.quantity,
                cost: l.cost,
                duration: l.duration,
                price_multiplier: l.price_multiplier,
            })
            .collect(),
        extra_services: totals
            .extras
            .iter()
            .map(|l| OrderExtraServiceLine {
                id: 0,
                order_id: 0,
                extra_service_id: l.extra_service_id,
                extra_service_name: l.extra_service_name.clone(),
                quantity: l.quantity,
                hours: l.hours,
                cost: l.cost,
                duration: l.duration,
                price_multiplier: l.price_multiplier,
            })
            .collect(),
    }
}

fn order_snapshot(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id,
        "user_id": order.user_id,
        "status": order.status.as_str(),
        "sub_total": order.sub_total.to_string(),
        "discount_amount": order.discount_amount.to_string(),
        "subscription_discount_amount": order.subscription_discount_amount.to_string(),
        "tax": order.tax.to_string(),
        "tips": order.tips.to_string(),
        "gift_card_amount_used": order.gift_card_amount_used.to_string(),
        "total": order.total.to_string(),
        "is_paid": order.is_paid,
        "cancellation_reason": order.cancellation_reason,
    })
}
