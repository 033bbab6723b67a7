//! Promo code definition and its pure validator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::money::{percent_of, round_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountType {
    #[default]
    Percentage,
    Flat,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "Percentage",
            Self::Flat => "Flat",
        }
    }

    pub fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("flat") {
            Self::Flat
        } else {
            Self::Percentage
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promotional discount code
#[derive(Debug, Clone)]
pub struct PromoCode {
    pub id: i32,
    /// Stored upper-case
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percent for `Percentage`, currency amount for `Flat`
    pub discount_value: Decimal,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    /// `None` = unlimited
    pub max_usage_count: Option<i32>,
    /// `None` = unlimited
    pub max_usage_per_user: Option<i32>,
    pub current_usage_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromoCode {
    /// Normalized lookup form of a user-entered code
    pub fn normalize(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }

    /// Discount granted against `sub_total`; never exceeds it.
    pub fn discount_for(&self, sub_total: Decimal) -> Decimal {
        if sub_total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let amount = match self.discount_type {
            DiscountType::Percentage => percent_of(sub_total, self.discount_value),
            DiscountType::Flat => round_money(self.discount_value),
        };
        amount.max(Decimal::ZERO).min(sub_total)
    }
}

/// Result of validating a promo code. Never an error: an unusable code
/// is reported with `is_valid = false` and a reason.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoValidation {
    pub is_valid: bool,
    pub message: String,
    pub promo_code_id: Option<i32>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Decimal,
}

impl PromoValidation {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            promo_code_id: None,
            discount_type: None,
            discount_value: Decimal::ZERO,
        }
    }
}

/// Check a looked-up promo code against `now` and the caller's usage.
///
/// Checks run in a fixed order: existence and active flag, validity
/// window, global usage cap, per-user usage cap. The first failure wins.
pub fn validate_promo(
    promo: Option<&PromoCode>,
    now: DateTime<Utc>,
    uses_by_user: u64,
) -> PromoValidation {
    let Some(promo) = promo.filter(|p| p.is_active) else {
        return PromoValidation::invalid("Invalid promo code");
    };

    if let Some(from) = promo.valid_from {
        if now < from {
            return PromoValidation::invalid("Promo code is not yet valid");
        }
    }
    if let Some(to) = promo.valid_to {
        if now > to {
            return PromoValidation::invalid("Promo code has expired");
        }
    }

    if let Some(max) = promo.max_usage_count {
        if promo.current_usage_count >= max {
            return PromoValidation::invalid("Promo code usage limit reached");
        }
    }
    if let Some(max) = promo.max_usage_per_user {
        if uses_by_user >= max.max(0) as u64 {
            return PromoValidation::invalid("You have already used this promo code");
        }
    }

    PromoValidation {
        is_valid: true,
        message: "Promo code applied".to_string(),
        promo_code_id: Some(promo.id),
        discount_type: Some(promo.discount_type),
        discount_value: promo.discount_value,
    }
}
