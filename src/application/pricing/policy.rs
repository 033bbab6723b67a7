//! Fixed pricing constants, tunable from the `[booking]` config section

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Applied to the discounted subtotal
    pub sales_tax_rate: Decimal,
    /// Client/backend duration gap tolerated before the client value wins
    pub duration_tolerance_minutes: i32,
    /// Flat price of a 0-bedroom (studio) unit, before the multiplier
    pub studio_price: Decimal,
    pub studio_duration_minutes: i32,
    /// Minutes of work per maid when the crew size is derived
    pub minutes_per_maid: i32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            sales_tax_rate: Decimal::new(88, 3),
            duration_tolerance_minutes: 5,
            studio_price: Decimal::new(20, 0),
            studio_duration_minutes: 20,
            minutes_per_maid: 360,
        }
    }
}
