//! Cost and duration of a single selected service or extra

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::policy::PricingPolicy;
use crate::domain::catalog::{ExtraServiceDef, RelationType, ServiceDef};
use crate::shared::money::{bounded, round_money};
use crate::shared::{DomainError, DomainResult};

/// One priced line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    pub cost: Decimal,
    /// Minutes
    pub duration: i32,
    /// Multiplier actually applied to this line
    pub multiplier: Decimal,
    /// Consumed by a related line; contributes nothing and is not stored
    pub excluded: bool,
}

impl PricedLine {
    fn new(cost: Decimal, duration: i32, multiplier: Decimal) -> Self {
        Self {
            cost: round_money(cost),
            duration,
            multiplier,
            excluded: false,
        }
    }
}

/// Price a selected service.
///
/// `sibling_hours` is the quantity of the cart's "hours" service of the
/// same service type, if one was selected.
pub fn price_service(
    service: &ServiceDef,
    quantity: i32,
    sibling_hours: Option<i32>,
    multiplier: Decimal,
    policy: &PricingPolicy,
) -> DomainResult<PricedLine> {
    let qty = Decimal::from(quantity);

    if service.relation_type == RelationType::Cleaner {
        return Ok(match sibling_hours {
            Some(hours) => PricedLine::new(
                line_cost(&[service.cost, multiplier, qty, Decimal::from(hours)])?,
                line_minutes(hours, 60)?,
                multiplier,
            ),
            None => PricedLine::new(
                line_cost(&[service.cost, multiplier, qty])?,
                line_minutes(service.time_duration, quantity)?,
                multiplier,
            ),
        });
    }

    if service.is_bedrooms() && quantity == 0 {
        return Ok(PricedLine::new(
            line_cost(&[policy.studio_price, multiplier])?,
            policy.studio_duration_minutes,
            multiplier,
        ));
    }

    if service.relation_type == RelationType::Hours {
        return Ok(PricedLine {
            cost: Decimal::ZERO,
            duration: 0,
            multiplier,
            excluded: true,
        });
    }

    Ok(PricedLine::new(
        line_cost(&[service.cost, qty, multiplier])?,
        line_minutes(service.time_duration, quantity)?,
        multiplier,
    ))
}

/// Price a selected extra.
///
/// Deep-cleaning tier extras are flat: they are the source of the
/// multiplier, not subject to it. Same-day extras are always exempt.
pub fn price_extra(
    extra: &ExtraServiceDef,
    quantity: i32,
    hours: Decimal,
    multiplier: Decimal,
) -> DomainResult<PricedLine> {
    if extra.is_deep_cleaning_tier() {
        return Ok(PricedLine::new(extra.price, extra.duration, Decimal::ONE));
    }

    let multiplier = if extra.is_same_day_service {
        Decimal::ONE
    } else {
        multiplier
    };

    let line = if extra.has_hours {
        let minutes = Decimal::from(extra.duration)
            .checked_mul(hours)
            .and_then(|m| m.round().to_i32())
            .ok_or_else(out_of_range_duration)?;
        PricedLine::new(line_cost(&[extra.price, hours, multiplier])?, minutes, multiplier)
    } else if extra.has_quantity {
        PricedLine::new(
            line_cost(&[extra.price, Decimal::from(quantity), multiplier])?,
            line_minutes(extra.duration, quantity)?,
            multiplier,
        )
    } else {
        PricedLine::new(line_cost(&[extra.price, multiplier])?, extra.duration, multiplier)
    };
    Ok(line)
}

/// Product of all factors; fails instead of overflowing
fn line_cost(factors: &[Decimal]) -> DomainResult<Decimal> {
    let product = factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.checked_mul(*factor));
    bounded(product, "Line price")
}

fn line_minutes(per_unit: i32, units: i32) -> DomainResult<i32> {
    per_unit.checked_mul(units).ok_or_else(out_of_range_duration)
}

fn out_of_range_duration() -> DomainError {
    DomainError::Validation("Line duration is out of range".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::InputType;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service(key: &str, relation: RelationType, cost: &str, minutes: i32) -> ServiceDef {
        ServiceDef {
            id: 1,
            service_type_id: 1,
            name: key.to_string(),
            service_key: key.to_string(),
            cost: d(cost),
            time_duration: minutes,
            input_type: InputType::Dropdown,
            min_value: None,
            max_value: None,
            relation_type: relation,
            display_order: 0,
            is_active: true,
        }
    }

    fn extra(price: &str) -> ExtraServiceDef {
        ExtraServiceDef {
            id: 10,
            service_type_id: None,
            name: "Inside fridge".into(),
            price: d(price),
            duration: 30,
            has_quantity: false,
            has_hours: false,
            is_deep_cleaning: false,
            is_super_deep_cleaning: false,
            is_same_day_service: false,
            price_multiplier: Decimal::ONE,
            is_active: true,
        }
    }

    #[test]
    fn cleaner_paired_with_hours() {
        let policy = PricingPolicy::default();
        let cleaners = service("cleaners", RelationType::Cleaner, "25", 60);
        let line = price_service(&cleaners, 2, Some(3), Decimal::ONE, &policy).unwrap();
        assert_eq!(line.cost, d("150"));
        assert_eq!(line.duration, 180);
        assert!(!line.excluded);

        let hours = service("hours", RelationType::Hours, "25", 60);
        let line = price_service(&hours, 3, None, Decimal::ONE, &policy).unwrap();
        assert!(line.excluded);
        assert_eq!(line.cost, Decimal::ZERO);
        assert_eq!(line.duration, 0);
    }

    #[test]
    fn cleaner_without_hours_falls_back_to_quantity() {
        let cleaners = service("cleaners", RelationType::Cleaner, "25", 90);
        let line = price_service(&cleaners, 2, None, d("1.5"), &PricingPolicy::default()).unwrap();
        assert_eq!(line.cost, d("75"));
        assert_eq!(line.duration, 180);
    }

    #[test]
    fn studio_ignores_unit_cost() {
        let bedrooms = service("bedrooms", RelationType::None, "45", 60);
        let line = price_service(&bedrooms, 0, None, d("1.5"), &PricingPolicy::default()).unwrap();
        assert_eq!(line.cost, d("30"));
        assert_eq!(line.duration, 20);
    }

    #[test]
    fn regular_service_scales_by_quantity_and_multiplier() {
        let bedrooms = service("bedrooms", RelationType::None, "10", 45);
        let line = price_service(&bedrooms, 2, None, d("1.5"), &PricingPolicy::default()).unwrap();
        assert_eq!(line.cost, d("30"));
        assert_eq!(line.duration, 90);
        assert_eq!(line.multiplier, d("1.5"));
    }

    #[test]
    fn same_day_extra_is_multiplier_exempt() {
        let mut same_day = extra("40");
        same_day.is_same_day_service = true;
        let line = price_extra(&same_day, 1, Decimal::ZERO, d("1.5")).unwrap();
        assert_eq!(line.cost, d("40"));
        assert_eq!(line.multiplier, Decimal::ONE);
    }

    #[test]
    fn deep_extra_is_flat() {
        let mut deep = extra("30");
        deep.is_super_deep_cleaning = true;
        deep.price_multiplier = d("1.5");
        deep.duration = 90;
        let line = price_extra(&deep, 1, Decimal::ZERO, d("1.5")).unwrap();
        assert_eq!(line.cost, d("30"));
        assert_eq!(line.duration, 90);
    }

    #[test]
    fn extra_by_hours_and_quantity() {
        let mut by_hours = extra("20");
        by_hours.has_hours = true;
        let line = price_extra(&by_hours, 1, d("1.5"), d("1.2")).unwrap();
        assert_eq!(line.cost, d("36"));
        assert_eq!(line.duration, 45);

        let mut by_qty = extra("5");
        by_qty.has_quantity = true;
        let line = price_extra(&by_qty, 4, Decimal::ZERO, Decimal::ONE).unwrap();
        assert_eq!(line.cost, d("20"));
        assert_eq!(line.duration, 120);
    }

    #[test]
    fn oversized_hours_fail_instead_of_overflowing() {
        let mut by_hours = extra("30");
        by_hours.has_hours = true;
        let huge = d("70000000000000000000000000000");
        assert!(matches!(
            price_extra(&by_hours, 1, huge, Decimal::ONE),
            Err(DomainError::Validation(_))
        ));

        let bedrooms = service("bedrooms", RelationType::None, "10", 30);
        assert!(matches!(
            price_service(&bedrooms, i32::MAX, None, Decimal::ONE, &PricingPolicy::default()),
            Err(DomainError::Validation(_))
        ));
    }
}
