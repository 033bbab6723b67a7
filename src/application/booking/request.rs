//! Inputs of the booking use cases

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::application::pricing::{AssembledTotals, CartSelection, PriceBreakdown};
use crate::domain::gift_card::GiftCard;
use crate::domain::order::{ContactInfo, ServiceAddress};
use crate::domain::promo::PromoCode;
use crate::domain::subscription::Subscription;
use crate::domain::user::UserRole;
use crate::domain::DiscountCode;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Everything that determines the price
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub user_id: String,
    pub service_type_id: i32,
    pub cart: CartSelection,
    pub tips: Decimal,
    pub discount: Option<DiscountCode>,
    pub subscription_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub quote: QuoteRequest,
    pub contact: ContactInfo,
    pub address: ServiceAddress,
    pub service_date: NaiveDate,
    pub service_time: NaiveTime,
    pub entry_method: Option<String>,
    pub special_instructions: Option<String>,
}

/// A fully priced cart with the discount sources it was priced against
#[derive(Debug, Clone)]
pub struct Quote {
    pub service_type_name: String,
    pub totals: AssembledTotals,
    pub breakdown: PriceBreakdown,
    pub promo: Option<PromoCode>,
    pub gift_card: Option<GiftCard>,
    pub subscription: Option<Subscription>,
}
