//! Subscription plans

use rust_decimal::Decimal;

/// A discount plan. Booking a plan never mutates it; only the user's
/// subscription state changes.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: i32,
    pub name: String,
    /// Percent off the subtotal, 0..=100
    pub discount_percentage: Decimal,
    /// Validity window granted on activation or renewal
    pub subscription_days: i32,
    pub is_active: bool,
}

impl Subscription {
    /// Only plans with a positive window are activated after booking
    pub fn grants_window(&self) -> bool {
        self.subscription_days > 0
    }
}
