//! Database entities module

pub mod extra_service;
pub mod gift_card;
pub mod gift_card_usage;
pub mod order;
pub mod order_extra_service;
pub mod order_service;
pub mod promo_code;
pub mod service;
pub mod service_type;
pub mod subscription;
pub mod user;

pub use extra_service::Entity as ExtraService;
pub use gift_card::Entity as GiftCard;
pub use gift_card_usage::Entity as GiftCardUsage;
pub use order::Entity as Order;
pub use order_extra_service::Entity as OrderExtraService;
pub use order_service::Entity as OrderService;
pub use promo_code::Entity as PromoCode;
pub use service::Entity as Service;
pub use service_type::Entity as ServiceType;
pub use subscription::Entity as Subscription;
pub use user::Entity as User;
