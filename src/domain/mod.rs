//! Domain layer: aggregates, repository interfaces, pure policy

pub mod audit;
pub mod catalog;
pub mod discount_code;
pub mod gift_card;
pub mod order;
pub mod promo;
pub mod repositories;
pub mod subscription;
pub mod user;

pub use audit::{AuditAction, AuditEntry, AuditSink, NoopAuditSink};
pub use discount_code::DiscountCode;
pub use repositories::{BookingUnitOfWork, RepositoryProvider};

pub use crate::shared::errors::{DomainError, DomainResult};
