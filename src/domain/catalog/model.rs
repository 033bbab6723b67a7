//! Catalog definitions as seen by the pricing pipeline

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

/// Service key that gets the studio (0 bedrooms) fixed price
pub const BEDROOMS_KEY: &str = "bedrooms";

/// Links two services of one service type into a joint cost model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationType {
    #[default]
    None,
    /// Crew size; priced together with the sibling `Hours` service
    Cleaner,
    /// Hours booked; consumed by the `Cleaner` service
    Hours,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cleaner => "cleaner",
            Self::Hours => "hours",
        }
    }

    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("cleaner") => Self::Cleaner,
            Some("hours") => Self::Hours,
            _ => Self::None,
        }
    }
}

/// How the client collects the quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Dropdown,
    Range,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dropdown => "dropdown",
            Self::Range => "range",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("range") {
            Self::Range
        } else {
            Self::Dropdown
        }
    }
}

/// A cleaning category ("Standard", "Deep", ...)
#[derive(Debug, Clone)]
pub struct ServiceTypeDef {
    pub id: i32,
    pub name: String,
    pub base_price: Decimal,
    pub display_order: i32,
    pub is_active: bool,
}

/// A configurable line item of a service type
#[derive(Debug, Clone)]
pub struct ServiceDef {
    pub id: i32,
    pub service_type_id: i32,
    pub name: String,
    /// Stable key, e.g. "bedrooms", "bathrooms", "cleaners", "hours"
    pub service_key: String,
    pub cost: Decimal,
    /// Minutes per unit
    pub time_duration: i32,
    pub input_type: InputType,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    pub relation_type: RelationType,
    pub display_order: i32,
    pub is_active: bool,
}

impl ServiceDef {
    pub fn is_bedrooms(&self) -> bool {
        self.service_key.eq_ignore_ascii_case(BEDROOMS_KEY)
    }
}

/// Optional add-on
#[derive(Debug, Clone)]
pub struct ExtraServiceDef {
    pub id: i32,
    /// `None` means the extra is offered for every service type
    pub service_type_id: Option<i32>,
    pub name: String,
    pub price: Decimal,
    /// Minutes
    pub duration: i32,
    pub has_quantity: bool,
    pub has_hours: bool,
    pub is_deep_cleaning: bool,
    pub is_super_deep_cleaning: bool,
    pub is_same_day_service: bool,
    pub price_multiplier: Decimal,
    pub is_active: bool,
}

impl ExtraServiceDef {
    /// Deep or super-deep tier extra: it supplies the cart multiplier
    pub fn is_deep_cleaning_tier(&self) -> bool {
        self.is_deep_cleaning || self.is_super_deep_cleaning
    }

    /// At most one deep-cleaning flag may be set on a catalog entry.
    pub fn validate_flags(&self) -> DomainResult<()> {
        if self.is_deep_cleaning && self.is_super_deep_cleaning {
            return Err(DomainError::Validation(format!(
                "Extra service '{}' cannot be both deep and super deep cleaning",
                self.name
            )));
        }
        Ok(())
    }
}

/// Request-scoped read model of every catalog entry a cart references.
///
/// Assembled once before pricing and passed by reference to all pricing
/// functions so the pipeline never goes back to the database mid-loop.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub service_type: ServiceTypeDef,
    services: HashMap<i32, ServiceDef>,
    extras: HashMap<i32, ExtraServiceDef>,
}

impl CatalogSnapshot {
    pub fn new(
        service_type: ServiceTypeDef,
        services: impl IntoIterator<Item = ServiceDef>,
        extras: impl IntoIterator<Item = ExtraServiceDef>,
    ) -> Self {
        Self {
            service_type,
            services: services.into_iter().map(|s| (s.id, s)).collect(),
            extras: extras.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn service(&self, id: i32) -> DomainResult<&ServiceDef> {
        self.services
            .get(&id)
            .ok_or_else(|| DomainError::not_found("Service", "id", id))
    }

    pub fn extra(&self, id: i32) -> DomainResult<&ExtraServiceDef> {
        self.extras
            .get(&id)
            .ok_or_else(|| DomainError::not_found("ExtraService", "id", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(deep: bool, super_deep: bool) -> ExtraServiceDef {
        ExtraServiceDef {
            id: 1,
            service_type_id: None,
            name: "Deep".into(),
            price: Decimal::new(30, 0),
            duration: 60,
            has_quantity: false,
            has_hours: false,
            is_deep_cleaning: deep,
            is_super_deep_cleaning: super_deep,
            is_same_day_service: false,
            price_multiplier: Decimal::new(15, 1),
            is_active: true,
        }
    }

    #[test]
    fn relation_type_parse() {
        assert_eq!(RelationType::parse(Some("cleaner")), RelationType::Cleaner);
        assert_eq!(RelationType::parse(Some(" Hours ")), RelationType::Hours);
        assert_eq!(RelationType::parse(Some("")), RelationType::None);
        assert_eq!(RelationType::parse(None), RelationType::None);
    }

    #[test]
    fn both_deep_flags_rejected() {
        assert!(extra(true, true).validate_flags().is_err());
        assert!(extra(true, false).validate_flags().is_ok());
        assert!(extra(false, true).is_deep_cleaning_tier());
    }

    #[test]
    fn snapshot_lookup_reports_missing_entries() {
        let snapshot = CatalogSnapshot::new(
            ServiceTypeDef {
                id: 1,
                name: "Standard".into(),
                base_price: Decimal::new(100, 0),
                display_order: 0,
                is_active: true,
            },
            Vec::new(),
            vec![extra(true, false)],
        );
        assert!(snapshot.extra(1).is_ok());
        assert!(matches!(
            snapshot.service(99),
            Err(DomainError::NotFound { entity: "Service", .. })
        ));
    }
}
