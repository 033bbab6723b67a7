//! Order totals assembler
//!
//! Two phases: the cart multiplier and deep-cleaning fee are resolved from
//! the selected extras first, then every line is priced against them.

use rust_decimal::Decimal;
use tracing::warn;

use super::line_item::{price_extra, price_service};
use super::policy::PricingPolicy;
use crate::domain::catalog::{CatalogSnapshot, ExtraServiceDef, RelationType};
use crate::shared::money::{bounded, round_money};
use crate::shared::{DomainError, DomainResult};

/// Upper bound on the hours booked for one hourly extra
pub const MAX_EXTRA_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedService {
    pub service_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedExtra {
    pub extra_service_id: i32,
    pub quantity: i32,
    pub hours: Decimal,
}

/// What the client picked, before pricing
#[derive(Debug, Clone, Default)]
pub struct CartSelection {
    pub services: Vec<SelectedService>,
    pub extras: Vec<SelectedExtra>,
    /// Explicit crew size; trusted when present
    pub maids_count: Option<i32>,
    /// Client-side duration estimate in minutes
    pub total_duration: Option<i32>,
}

/// Outcome of phase 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierResolution {
    pub multiplier: Decimal,
    pub deep_cleaning_fee: Decimal,
    pub source_extra_id: Option<i32>,
}

impl Default for TierResolution {
    fn default() -> Self {
        Self {
            multiplier: Decimal::ONE,
            deep_cleaning_fee: Decimal::ZERO,
            source_extra_id: None,
        }
    }
}

/// Pick the deep-cleaning tier extra that drives the cart.
///
/// Greatest multiplier wins; ties prefer super-deep, then the lower id.
/// Independent of selection order.
pub fn resolve_tier<'a>(extras: impl IntoIterator<Item = &'a ExtraServiceDef>) -> TierResolution {
    extras
        .into_iter()
        .filter(|e| e.is_deep_cleaning_tier())
        .max_by(|a, b| {
            a.price_multiplier
                .cmp(&b.price_multiplier)
                .then(a.is_super_deep_cleaning.cmp(&b.is_super_deep_cleaning))
                .then(b.id.cmp(&a.id))
        })
        .map(|e| TierResolution {
            multiplier: e.price_multiplier,
            deep_cleaning_fee: e.price,
            source_extra_id: Some(e.id),
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLineQuote {
    pub service_id: i32,
    pub service_name: String,
    pub quantity: i32,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtraLineQuote {
    pub extra_service_id: i32,
    pub extra_service_name: String,
    pub quantity: i32,
    pub hours: Decimal,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

/// Client and backend durations disagree beyond the tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationDiscrepancy {
    pub client_minutes: i32,
    pub computed_minutes: i32,
}

impl DurationDiscrepancy {
    pub fn gap(&self) -> i32 {
        (self.client_minutes - self.computed_minutes).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledTotals {
    pub sub_total: Decimal,
    /// Duration stored on the order (reconciled)
    pub total_duration: i32,
    pub computed_duration: i32,
    pub maids_count: i32,
    pub tier: TierResolution,
    pub services: Vec<ServiceLineQuote>,
    pub extras: Vec<ExtraLineQuote>,
    pub discrepancy: Option<DurationDiscrepancy>,
}

pub fn assemble(
    snapshot: &CatalogSnapshot,
    cart: &CartSelection,
    policy: &PricingPolicy,
) -> DomainResult<AssembledTotals> {
    let service_type = &snapshot.service_type;

    // Phase 1
    let mut selected_extras = Vec::with_capacity(cart.extras.len());
    for sel in &cart.extras {
        let extra = snapshot.extra(sel.extra_service_id)?;
        if extra.service_type_id.is_some_and(|id| id != service_type.id) {
            return Err(DomainError::Validation(format!(
                "Extra service '{}' is not offered for '{}'",
                extra.name, service_type.name
            )));
        }
        validate_extra_selection(extra, sel)?;
        selected_extras.push((extra, sel));
    }
    let tier = resolve_tier(selected_extras.iter().map(|(e, _)| *e));

    // Phase 2
    let mut sub_total = bounded(
        service_type.base_price.checked_mul(tier.multiplier),
        "Base price",
    )?;
    let mut duration = 0i32;

    let mut selected_services = Vec::with_capacity(cart.services.len());
    for sel in &cart.services {
        let service = snapshot.service(sel.service_id)?;
        if service.service_type_id != service_type.id {
            return Err(DomainError::Validation(format!(
                "Service '{}' does not belong to '{}'",
                service.name, service_type.name
            )));
        }
        validate_quantity(service.name.as_str(), sel.quantity, service.min_value, service.max_value)?;
        selected_services.push((service, sel));
    }

    let sibling_hours = selected_services
        .iter()
        .find(|(s, _)| s.relation_type == RelationType::Hours)
        .map(|(_, sel)| sel.quantity);

    let mut services = Vec::with_capacity(selected_services.len());
    let mut cleaner_quantity = None;
    for (service, sel) in &selected_services {
        let line = price_service(service, sel.quantity, sibling_hours, tier.multiplier, policy)?;
        if line.excluded {
            continue;
        }
        if service.relation_type == RelationType::Cleaner {
            cleaner_quantity = Some(sel.quantity);
        }
        sub_total = add_cost(sub_total, line.cost)?;
        duration = add_minutes(duration, line.duration)?;
        services.push(ServiceLineQuote {
            service_id: service.id,
            service_name: service.name.clone(),
            quantity: sel.quantity,
            cost: line.cost,
            duration: line.duration,
            price_multiplier: line.multiplier,
        });
    }

    let mut extras = Vec::with_capacity(selected_extras.len());
    for (extra, sel) in &selected_extras {
        let line = price_extra(extra, sel.quantity, sel.hours, tier.multiplier)?;
        if !extra.is_deep_cleaning_tier() {
            sub_total = add_cost(sub_total, line.cost)?;
        }
        duration = add_minutes(duration, line.duration)?;
        extras.push(ExtraLineQuote {
            extra_service_id: extra.id,
            extra_service_name: extra.name.clone(),
            quantity: sel.quantity,
            hours: sel.hours,
            cost: line.cost,
            duration: line.duration,
            price_multiplier: line.multiplier,
        });
    }

    sub_total = add_cost(sub_total, tier.deep_cleaning_fee)?;

    let maids_count = match cart.maids_count.filter(|n| *n > 0) {
        Some(explicit) => explicit,
        None => match cleaner_quantity.filter(|q| *q > 0) {
            Some(cleaners) => cleaners,
            None => derive_maids(duration, policy.minutes_per_maid),
        },
    };

    let (total_duration, discrepancy) =
        reconcile_duration(cart.total_duration, duration, policy.duration_tolerance_minutes)?;
    if let Some(gap) = &discrepancy {
        warn!(
            client_minutes = gap.client_minutes,
            computed_minutes = gap.computed_minutes,
            service_type_id = service_type.id,
            "Client duration differs from computed duration, keeping client value"
        );
    }

    Ok(AssembledTotals {
        sub_total: round_money(sub_total),
        total_duration,
        computed_duration: duration,
        maids_count,
        tier,
        services,
        extras,
        discrepancy,
    })
}

fn add_cost(sub_total: Decimal, cost: Decimal) -> DomainResult<Decimal> {
    bounded(sub_total.checked_add(cost), "Order subtotal")
}

fn add_minutes(total: i32, minutes: i32) -> DomainResult<i32> {
    total
        .checked_add(minutes)
        .ok_or_else(|| DomainError::Validation("Order duration is out of range".into()))
}

/// `ceil(minutes / minutes_per_maid)`, at least 1
fn derive_maids(minutes: i32, minutes_per_maid: i32) -> i32 {
    if minutes <= 0 || minutes_per_maid <= 0 {
        return 1;
    }
    ((minutes + minutes_per_maid - 1) / minutes_per_maid).max(1)
}

fn reconcile_duration(
    client: Option<i32>,
    computed: i32,
    tolerance: i32,
) -> DomainResult<(i32, Option<DurationDiscrepancy>)> {
    match client {
        Some(minutes) if minutes < 0 => Err(DomainError::Validation(
            "Total duration cannot be negative".into(),
        )),
        Some(minutes) if (minutes - computed).abs() > tolerance => Ok((
            minutes,
            Some(DurationDiscrepancy {
                client_minutes: minutes,
                computed_minutes: computed,
            }),
        )),
        _ => Ok((computed, None)),
    }
}

fn validate_quantity(name: &str, quantity: i32, min: Option<i32>, max: Option<i32>) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::Validation(format!(
            "Quantity for '{}' cannot be negative",
            name
        )));
    }
    if min.is_some_and(|m| quantity < m) || max.is_some_and(|m| quantity > m) {
        return Err(DomainError::Validation(format!(
            "Quantity {} for '{}' is out of range",
            quantity, name
        )));
    }
    Ok(())
}

fn validate_extra_selection(extra: &ExtraServiceDef, sel: &SelectedExtra) -> DomainResult<()> {
    if extra.has_hours && sel.hours <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "Extra service '{}' requires a positive number of hours",
            extra.name
        )));
    }
    if extra.has_hours && sel.hours > Decimal::from(MAX_EXTRA_HOURS) {
        return Err(DomainError::Validation(format!(
            "Extra service '{}' cannot exceed {} hours",
            extra.name, MAX_EXTRA_HOURS
        )));
    }
    if extra.has_quantity && sel.quantity < 1 {
        return Err(DomainError::Validation(format!(
            "Extra service '{}' requires a quantity of at least 1",
            extra.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{InputType, ServiceDef, ServiceTypeDef};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service_type(base: &str) -> ServiceTypeDef {
        ServiceTypeDef {
            id: 1,
            name: "Standard".into(),
            base_price: d(base),
            display_order: 0,
            is_active: true,
        }
    }

    fn service(id: i32, key: &str, relation: RelationType, cost: &str, minutes: i32) -> ServiceDef {
        ServiceDef {
            id,
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

    fn extra(id: i32, price: &str, multiplier: &str) -> ExtraServiceDef {
        ExtraServiceDef {
            id,
            service_type_id: None,
            name: format!("extra-{}", id),
            price: d(price),
            duration: 60,
            has_quantity: false,
            has_hours: false,
            is_deep_cleaning: false,
            is_super_deep_cleaning: false,
            is_same_day_service: false,
            price_multiplier: d(multiplier),
            is_active: true,
        }
    }

    fn pick_service(service_id: i32, quantity: i32) -> SelectedService {
        SelectedService { service_id, quantity }
    }

    fn pick_extra(extra_service_id: i32) -> SelectedExtra {
        SelectedExtra {
            extra_service_id,
            quantity: 1,
            hours: Decimal::ZERO,
        }
    }

    #[test]
    fn super_deep_end_to_end_subtotal() {
        let mut super_deep = extra(7, "30", "1.5");
        super_deep.is_super_deep_cleaning = true;
        let snapshot = CatalogSnapshot::new(
            service_type("100"),
            vec![service(1, "bedrooms", RelationType::None, "10", 30)],
            vec![super_deep],
        );
        let cart = CartSelection {
            services: vec![pick_service(1, 2)],
            extras: vec![pick_extra(7)],
            ..Default::default()
        };

        let totals = assemble(&snapshot, &cart, &PricingPolicy::default()).unwrap();
        assert_eq!(totals.sub_total, d("210"));
        assert_eq!(totals.tier.multiplier, d("1.5"));
        assert_eq!(totals.tier.deep_cleaning_fee, d("30"));
        assert_eq!(totals.computed_duration, 60 + 60);
        assert_eq!(totals.maids_count, 1);
        assert_eq!(totals.extras[0].cost, d("30"));
    }

    #[test]
    fn hours_service_is_not_a_line() {
        let snapshot = CatalogSnapshot::new(
            service_type("0"),
            vec![
                service(1, "cleaners", RelationType::Cleaner, "25", 60),
                service(2, "hours", RelationType::Hours, "0", 60),
            ],
            Vec::new(),
        );
        let cart = CartSelection {
            services: vec![pick_service(2, 3), pick_service(1, 2)],
            ..Default::default()
        };
        let totals = assemble(&snapshot, &cart, &PricingPolicy::default()).unwrap();
        assert_eq!(totals.services.len(), 1);
        assert_eq!(totals.sub_total, d("150"));
        assert_eq!(totals.total_duration, 180);
        assert_eq!(totals.maids_count, 2);
    }

    #[test]
    fn tier_choice_is_order_independent() {
        let mut deep = extra(3, "20", "1.25");
        deep.is_deep_cleaning = true;
        let mut super_deep = extra(4, "30", "1.5");
        super_deep.is_super_deep_cleaning = true;

        let a = resolve_tier([&deep, &super_deep]);
        let b = resolve_tier([&super_deep, &deep]);
        assert_eq!(a, b);
        assert_eq!(a.source_extra_id, Some(4));

        // a larger deep multiplier beats super-deep
        deep.price_multiplier = d("2");
        assert_eq!(resolve_tier([&super_deep, &deep]).source_extra_id, Some(3));

        // tie goes to super-deep
        deep.price_multiplier = d("1.5");
        assert_eq!(resolve_tier([&deep, &super_deep]).source_extra_id, Some(4));

        assert_eq!(resolve_tier([&extra(5, "10", "1")]), TierResolution::default());
    }

    #[test]
    fn derived_crew_size() {
        assert_eq!(derive_maids(0, 360), 1);
        assert_eq!(derive_maids(360, 360), 1);
        assert_eq!(derive_maids(361, 360), 2);
        assert_eq!(derive_maids(900, 360), 3);
    }

    #[test]
    fn explicit_crew_size_is_trusted() {
        let snapshot = CatalogSnapshot::new(
            service_type("100"),
            vec![service(1, "bedrooms", RelationType::None, "10", 400)],
            Vec::new(),
        );
        let cart = CartSelection {
            services: vec![pick_service(1, 1)],
            maids_count: Some(4),
            ..Default::default()
        };
        assert_eq!(assemble(&snapshot, &cart, &PricingPolicy::default()).unwrap().maids_count, 4);

        let cart = CartSelection {
            maids_count: None,
            ..cart
        };
        assert_eq!(assemble(&snapshot, &cart, &PricingPolicy::default()).unwrap().maids_count, 2);
    }

    #[test]
    fn duration_reconciliation() {
        assert_eq!(reconcile_duration(Some(183), 180, 5).unwrap(), (180, None));
        assert_eq!(reconcile_duration(None, 180, 5).unwrap(), (180, None));

        let (kept, gap) = reconcile_duration(Some(240), 180, 5).unwrap();
        assert_eq!(kept, 240);
        assert_eq!(gap.unwrap().gap(), 60);

        assert!(reconcile_duration(Some(-1), 180, 5).is_err());
    }

    #[test]
    fn foreign_service_rejected() {
        let mut other = service(9, "bedrooms", RelationType::None, "10", 30);
        other.service_type_id = 2;
        let snapshot = CatalogSnapshot::new(service_type("100"), vec![other], Vec::new());
        let cart = CartSelection {
            services: vec![pick_service(9, 1)],
            ..Default::default()
        };
        assert!(matches!(
            assemble(&snapshot, &cart, &PricingPolicy::default()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn same_day_extra_under_multiplier() {
        let mut deep = extra(3, "20", "1.5");
        deep.is_deep_cleaning = true;
        let mut same_day = extra(4, "40", "1");
        same_day.is_same_day_service = true;
        let snapshot = CatalogSnapshot::new(service_type("100"), Vec::new(), vec![deep, same_day]);
        let cart = CartSelection {
            extras: vec![pick_extra(4), pick_extra(3)],
            ..Default::default()
        };
        let totals = assemble(&snapshot, &cart, &PricingPolicy::default()).unwrap();
        // 100 × 1.5 + 40 + 20 fee
        assert_eq!(totals.sub_total, d("210"));
        assert_eq!(totals.extras[0].price_multiplier, Decimal::ONE);
    }

    #[test]
    fn hourly_extra_is_capped() {
        let mut cabinets = extra(5, "30", "1");
        cabinets.has_hours = true;
        let snapshot = CatalogSnapshot::new(service_type("100"), Vec::new(), vec![cabinets]);
        let cart_with = |hours: &str| CartSelection {
            extras: vec![SelectedExtra {
                extra_service_id: 5,
                quantity: 1,
                hours: d(hours),
            }],
            ..Default::default()
        };

        let totals = assemble(&snapshot, &cart_with("24"), &PricingPolicy::default()).unwrap();
        assert_eq!(totals.sub_total, d("820"));
        assert_eq!(totals.computed_duration, 24 * 60);

        for hours in ["24.5", "70000000000000000000000000000"] {
            assert!(matches!(
                assemble(&snapshot, &cart_with(hours), &PricingPolicy::default()),
                Err(DomainError::Validation(_))
            ));
        }
    }

    #[test]
    fn runaway_catalog_price_is_rejected() {
        let snapshot = CatalogSnapshot::new(
            service_type("100"),
            vec![service(1, "bedrooms", RelationType::None, "900000000000", 30)],
            Vec::new(),
        );
        let cart = CartSelection {
            services: vec![pick_service(1, 100)],
            ..Default::default()
        };
        assert!(matches!(
            assemble(&snapshot, &cart, &PricingPolicy::default()),
            Err(DomainError::Validation(_))
        ));
    }
}
