//! Booking module: quoting, booking creation, payment simulation, order lifecycle

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
