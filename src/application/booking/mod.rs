//! Booking use cases

pub mod error;
pub mod request;
pub mod service;

pub use error::{BookingError, BookingStage};
pub use request::{Actor, BookingRequest, Quote, QuoteRequest};
pub use service::{
    BookingOutcome, BookingService, GiftCardPreview, PaymentOutcome, PostCommitOutcome, PromoCheck,
};
