//! Order aggregate

pub mod model;
pub mod repository;

pub use model::{
    ContactInfo, Order, OrderExtraServiceLine, OrderServiceLine, OrderStatus, ServiceAddress,
};
pub use repository::OrderRepository;
