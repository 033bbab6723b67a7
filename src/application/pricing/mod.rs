//! Pricing pipeline: line items, totals, discount stack

pub mod discounts;
pub mod line_item;
pub mod policy;
pub mod totals;

pub use discounts::{resolve_discounts, DiscountSources, PriceBreakdown};
pub use line_item::{price_extra, price_service, PricedLine};
pub use policy::PricingPolicy;
pub use totals::{
    assemble, resolve_tier, AssembledTotals, CartSelection, DurationDiscrepancy, ExtraLineQuote,
    SelectedExtra, SelectedService, ServiceLineQuote, TierResolution, MAX_EXTRA_HOURS,
};
