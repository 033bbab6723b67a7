//! Subscription plan aggregate

pub mod model;
pub mod repository;

pub use model::Subscription;
pub use repository::SubscriptionRepository;
