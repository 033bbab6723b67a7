//! Gift card aggregate

pub mod model;
pub mod repository;

pub use model::{validate_gift_card, GiftCard, GiftCardUsage, GiftCardValidation};
pub use repository::GiftCardRepository;
