//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories, the booking unit of work and the
//! unified RepositoryProvider.

pub mod booking_unit_of_work;
pub mod catalog_repository;
pub mod gift_card_repository;
pub mod order_repository;
pub mod promo_code_repository;
pub mod repository_provider;
pub mod subscription_repository;
pub mod user_repository;

pub use booking_unit_of_work::SeaOrmBookingUnitOfWork;
pub use repository_provider::SeaOrmRepositoryProvider;

use crate::shared::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
