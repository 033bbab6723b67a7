//! Booking DTOs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::booking::{GiftCardPreview, PromoCheck};
use crate::application::pricing::{
    CartSelection, DurationDiscrepancy, SelectedExtra, SelectedService, MAX_EXTRA_HOURS,
};
use crate::application::{Quote, QuoteRequest, SubscriptionEffect};
use crate::domain::order::{ContactInfo, Order, OrderExtraServiceLine, OrderServiceLine, ServiceAddress};
use crate::domain::DiscountCode;
use crate::shared::DomainResult;

const MAX_TIPS: i64 = 10_000;

fn default_quantity() -> i32 {
    1
}

fn decimal_in_range(value: &Decimal, max: i64) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(max) {
        let mut err = ValidationError::new("range");
        err.message = Some(format!("must be between 0 and {}", max).into());
        return Err(err);
    }
    Ok(())
}

fn validate_hours(hours: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(hours, MAX_EXTRA_HOURS)
}

fn validate_tips(tips: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(tips, MAX_TIPS)
}

// ── Requests ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectedServiceDto {
    pub service_id: i32,
    #[validate(range(min = 0, max = 100))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectedExtraServiceDto {
    pub extra_service_id: i32,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 0, max = 100))]
    pub quantity: i32,
    /// Required for hourly extras
    #[serde(default)]
    #[validate(custom(function = "validate_hours"))]
    pub hours: Decimal,
}

/// Everything that determines the price of a cart
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CalculateRequest {
    #[validate(range(min = 1))]
    pub service_type_id: i32,
    #[serde(default)]
    #[validate(nested)]
    pub services: Vec<SelectedServiceDto>,
    #[serde(default)]
    #[validate(nested)]
    pub extra_services: Vec<SelectedExtraServiceDto>,
    #[validate(range(min = 1, max = 20))]
    pub maids_count: Option<i32>,
    /// Client-computed duration in minutes
    #[validate(range(min = 0))]
    pub total_duration: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "validate_tips"))]
    pub tips: Decimal,
    /// Promo code, or a gift card code in `XXXX-XXXX-XXXX` form
    pub promo_code: Option<String>,
    pub gift_card_code: Option<String>,
    pub subscription_id: Option<i32>,
}

impl CalculateRequest {
    pub fn to_quote_request(&self, user_id: &str) -> DomainResult<QuoteRequest> {
        let discount =
            DiscountCode::from_fields(self.promo_code.as_deref(), self.gift_card_code.as_deref())?;
        Ok(QuoteRequest {
            user_id: user_id.to_string(),
            service_type_id: self.service_type_id,
            cart: CartSelection {
                services: self
                    .services
                    .iter()
                    .map(|s| SelectedService {
                        service_id: s.service_id,
                        quantity: s.quantity,
                    })
                    .collect(),
                extras: self
                    .extra_services
                    .iter()
                    .map(|e| SelectedExtra {
                        extra_service_id: e.extra_service_id,
                        quantity: e.quantity,
                        hours: e.hours,
                    })
                    .collect(),
                maids_count: self.maids_count,
                total_duration: self.total_duration,
            },
            tips: self.tips,
            discount,
            subscription_id: self.subscription_id,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub cart: CalculateRequest,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: String,

    #[validate(length(min = 1, max = 255))]
    pub address: String,
    pub apt_suite: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 2, max = 50))]
    pub state: String,
    #[validate(length(min = 3, max = 10))]
    pub zip_code: String,

    pub service_date: NaiveDate,
    pub service_time: NaiveTime,
    pub entry_method: Option<String>,
    #[validate(length(max = 2000))]
    pub special_instructions: Option<String>,
}

impl CreateBookingRequest {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    pub fn service_address(&self) -> ServiceAddress {
        ServiceAddress {
            address: self.address.trim().to_string(),
            apt_suite: self.apt_suite.clone().filter(|s| !s.trim().is_empty()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidatePromoRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// When supplied, the discount against it is returned
    pub sub_total: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyGiftCardRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    pub order_total: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceLineDto {
    pub service_id: i32,
    pub service_name: String,
    pub quantity: i32,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

impl From<&OrderServiceLine> for ServiceLineDto {
    fn from(l: &OrderServiceLine) -> Self {
        Self {
            service_id: l.service_id,
            service_name: l.service_name.clone(),
            quantity: l.quantity,
            cost: l.cost,
            duration: l.duration,
            price_multiplier: l.price_multiplier,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExtraServiceLineDto {
    pub extra_service_id: i32,
    pub extra_service_name: String,
    pub quantity: i32,
    pub hours: Decimal,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

impl From<&OrderExtraServiceLine> for ExtraServiceLineDto {
    fn from(l: &OrderExtraServiceLine) -> Self {
        Self {
            extra_service_id: l.extra_service_id,
            extra_service_name: l.extra_service_name.clone(),
            quantity: l.quantity,
            hours: l.hours,
            cost: l.cost,
            duration: l.duration,
            price_multiplier: l.price_multiplier,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DurationDiscrepancyDto {
    pub client_minutes: i32,
    pub computed_minutes: i32,
}

impl From<DurationDiscrepancy> for DurationDiscrepancyDto {
    fn from(d: DurationDiscrepancy) -> Self {
        Self {
            client_minutes: d.client_minutes,
            computed_minutes: d.computed_minutes,
        }
    }
}

/// Price quote for a cart; nothing is persisted
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteDto {
    pub service_type_name: String,
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub subscription_discount_amount: Decimal,
    pub tax: Decimal,
    pub tips: Decimal,
    pub gift_card_amount_used: Decimal,
    pub total: Decimal,
    pub total_duration: i32,
    pub computed_duration: i32,
    pub maids_count: i32,
    pub price_multiplier: Decimal,
    pub deep_cleaning_fee: Decimal,
    pub services: Vec<ServiceLineDto>,
    pub extra_services: Vec<ExtraServiceLineDto>,
    pub duration_discrepancy: Option<DurationDiscrepancyDto>,
}

impl From<Quote> for QuoteDto {
    fn from(q: Quote) -> Self {
        let t = q.totals;
        let b = q.breakdown;
        Self {
            service_type_name: q.service_type_name,
            sub_total: b.sub_total,
            discount_amount: b.discount_amount,
            subscription_discount_amount: b.subscription_discount_amount,
            tax: b.tax,
            tips: b.tips,
            gift_card_amount_used: b.gift_card_amount_used,
            total: b.total,
            total_duration: t.total_duration,
            computed_duration: t.computed_duration,
            maids_count: t.maids_count,
            price_multiplier: t.tier.multiplier,
            deep_cleaning_fee: t.tier.deep_cleaning_fee,
            services: t
                .services
                .into_iter()
                .map(|l| ServiceLineDto {
                    service_id: l.service_id,
                    service_name: l.service_name,
                    quantity: l.quantity,
                    cost: l.cost,
                    duration: l.duration,
                    price_multiplier: l.price_multiplier,
                })
                .collect(),
            extra_services: t
                .extras
                .into_iter()
                .map(|l| ExtraServiceLineDto {
                    extra_service_id: l.extra_service_id,
                    extra_service_name: l.extra_service_name,
                    quantity: l.quantity,
                    hours: l.hours,
                    cost: l.cost,
                    duration: l.duration,
                    price_multiplier: l.price_multiplier,
                })
                .collect(),
            duration_discrepancy: t.discrepancy.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: i32,
    pub user_id: String,
    pub service_type_id: i32,
    pub service_type_name: String,
    /// Pending, Active, Done or Cancelled
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub apt_suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub service_date: NaiveDate,
    pub service_time: NaiveTime,
    pub entry_method: Option<String>,
    pub special_instructions: Option<String>,
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub subscription_discount_amount: Decimal,
    pub tax: Decimal,
    pub tips: Decimal,
    pub gift_card_amount_used: Decimal,
    pub total: Decimal,
    pub total_duration: i32,
    pub maids_count: i32,
    pub promo_code: Option<String>,
    pub gift_card_code: Option<String>,
    pub subscription_id: Option<i32>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub services: Vec<ServiceLineDto>,
    pub extra_services: Vec<ExtraServiceLineDto>,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            services: o.services.iter().map(ServiceLineDto::from).collect(),
            extra_services: o.extra_services.iter().map(ExtraServiceLineDto::from).collect(),
            id: o.id,
            user_id: o.user_id,
            service_type_id: o.service_type_id,
            service_type_name: o.service_type_name,
            status: o.status.as_str().to_string(),
            first_name: o.contact.first_name,
            last_name: o.contact.last_name,
            email: o.contact.email,
            phone: o.contact.phone,
            address: o.address.address,
            apt_suite: o.address.apt_suite,
            city: o.address.city,
            state: o.address.state,
            zip_code: o.address.zip_code,
            service_date: o.service_date,
            service_time: o.service_time,
            entry_method: o.entry_method,
            special_instructions: o.special_instructions,
            sub_total: o.sub_total,
            discount_amount: o.discount_amount,
            subscription_discount_amount: o.subscription_discount_amount,
            tax: o.tax,
            tips: o.tips,
            gift_card_amount_used: o.gift_card_amount_used,
            total: o.total,
            total_duration: o.total_duration,
            maids_count: o.maids_count,
            promo_code: o.promo_code,
            gift_card_code: o.gift_card_code,
            subscription_id: o.subscription_id,
            is_paid: o.is_paid,
            paid_at: o.paid_at,
            cancellation_reason: o.cancellation_reason,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub order: OrderDto,
    /// Reference for `POST /simulate-payment/{order_id}`
    pub payment_handle: String,
    pub duration_discrepancy: Option<DurationDiscrepancyDto>,
    /// Post-commit effects that did not go through; the order stands
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidatePromoResponse {
    pub is_valid: bool,
    pub message: String,
    pub is_gift_card: bool,
    /// Percentage or Flat
    pub discount_type: Option<String>,
    pub discount_value: Decimal,
    pub discount_amount: Option<Decimal>,
}

impl From<PromoCheck> for ValidatePromoResponse {
    fn from(c: PromoCheck) -> Self {
        Self {
            is_valid: c.validation.is_valid,
            message: c.validation.message,
            is_gift_card: c.is_gift_card,
            discount_type: c.validation.discount_type.map(|t| t.as_str().to_string()),
            discount_value: c.validation.discount_value,
            discount_amount: c.discount_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GiftCardPreviewResponse {
    pub is_valid: bool,
    pub available_balance: Decimal,
    pub amount_to_apply: Decimal,
    pub remaining_balance: Decimal,
    pub message: String,
}

impl From<GiftCardPreview> for GiftCardPreviewResponse {
    fn from(p: GiftCardPreview) -> Self {
        Self {
            is_valid: p.validation.is_valid,
            available_balance: p.validation.available_balance,
            amount_to_apply: p.amount_to_apply,
            remaining_balance: p.remaining_balance,
            message: p.validation.message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionEffectDto {
    /// activated, renewed, skipped or failed
    pub status: String,
    pub subscription_id: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl From<SubscriptionEffect> for SubscriptionEffectDto {
    fn from(e: SubscriptionEffect) -> Self {
        match e {
            SubscriptionEffect::Activated {
                subscription_id,
                expiry_date,
            } => Self {
                status: "activated".into(),
                subscription_id: Some(subscription_id),
                expiry_date: Some(expiry_date),
                message: None,
            },
            SubscriptionEffect::Renewed {
                subscription_id,
                expiry_date,
            } => Self {
                status: "renewed".into(),
                subscription_id: Some(subscription_id),
                expiry_date: Some(expiry_date),
                message: None,
            },
            SubscriptionEffect::Skipped(reason) => Self {
                status: "skipped".into(),
                subscription_id: None,
                expiry_date: None,
                message: Some(reason),
            },
            SubscriptionEffect::Failed(reason) => Self {
                status: "failed".into(),
                subscription_id: None,
                expiry_date: None,
                message: Some(reason),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub order: OrderDto,
    pub subscription: Option<SubscriptionEffectDto>,
}
