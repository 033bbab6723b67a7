//! Promo code aggregate

pub mod model;
pub mod repository;

pub use model::{validate_promo, DiscountType, PromoCode, PromoValidation};
pub use repository::PromoCodeRepository;
