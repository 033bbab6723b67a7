pub mod audit;
pub mod booking;
pub mod pricing;
pub mod subscriptions;

// Re-export key types for convenience
pub use audit::{spawn_audit_logger, AuditBus, SharedAuditBus};
pub use booking::{
    Actor, BookingError, BookingOutcome, BookingRequest, BookingService, BookingStage, Quote,
    QuoteRequest,
};
pub use pricing::PricingPolicy;
pub use subscriptions::{SubscriptionEffect, SubscriptionManager};
