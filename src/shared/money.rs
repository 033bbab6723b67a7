//! Money helpers built on `rust_decimal`
//!
//! Prices are persisted as integer minor units (cents) and lifted into
//! `Decimal` for arithmetic. Every externally visible amount is rounded to
//! two decimal places, half away from zero.

use rust_decimal::prelude::*;

use super::{DomainError, DomainResult};

/// Rounding precision for monetary values
pub const DECIMAL_PLACES: u32 = 2;

/// Largest magnitude of any price, tip or total; always fits `i64` cents
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Accept the result of a checked operation only when it stays within
/// `MAX_AMOUNT_UNITS`.
pub fn bounded(value: Option<Decimal>, what: &str) -> DomainResult<Decimal> {
    value
        .filter(|v| v.abs() <= Decimal::from(MAX_AMOUNT_UNITS))
        .ok_or_else(|| DomainError::Validation(format!("{} is out of range", what)))
}

/// Round a monetary value to cents (half away from zero).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a stored minor-unit amount into a `Decimal`.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}

/// Convert a `Decimal` amount into minor units, rounding to cents first.
pub fn to_cents(value: Decimal) -> i64 {
    (round_money(value) * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(0)
}

/// Lift a stored ratio (multiplier, percentage) into a `Decimal`.
///
/// Non-finite values fall back to `default`.
pub fn ratio_from_f64(value: f64, default: Decimal) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(4))
        .unwrap_or(default)
}

/// Store a `Decimal` ratio as `f64`.
pub fn ratio_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// `value × percent / 100`, rounded to cents. Saturates instead of overflowing.
pub fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    round_money(value.saturating_mul(percent) / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round_money(d("18.475")), d("18.48"));
        assert_eq!(round_money(d("18.474")), d("18.47"));
        assert_eq!(round_money(d("0.005")), d("0.01"));
    }

    #[test]
    fn cents_conversion() {
        assert_eq!(from_cents(23848), d("238.48"));
        assert_eq!(to_cents(d("238.48")), 23848);
        assert_eq!(to_cents(d("0.125")), 13);
        assert_eq!(from_cents(0), Decimal::ZERO);
    }

    #[test]
    fn ratio_conversion() {
        assert_eq!(ratio_from_f64(1.5, Decimal::ONE), d("1.5"));
        assert_eq!(ratio_from_f64(f64::NAN, Decimal::ONE), Decimal::ONE);
        assert_eq!(ratio_to_f64(d("1.25")), 1.25);
    }

    #[test]
    fn bounded_rejects_overflow_and_huge_values() {
        assert_eq!(bounded(Some(d("238.48")), "Total").unwrap(), d("238.48"));
        assert!(matches!(
            bounded(Decimal::MAX.checked_mul(d("2")), "Total"),
            Err(DomainError::Validation(_))
        ));
        assert!(bounded(Some(d("1000000000000.01")), "Total").is_err());
        assert!(bounded(Some(d("-1000000000000.01")), "Total").is_err());
    }

    #[test]
    fn percent_of_subtotal() {
        assert_eq!(percent_of(d("210"), d("10")), d("21.00"));
        assert_eq!(percent_of(d("99.99"), d("12.5")), d("12.50"));
    }
}
