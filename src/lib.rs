//! # Cleaning Booking
//!
//! Prices cleaning-service carts and records bookings transactionally.
//!
//! ## Architecture
//!
//! - **domain**: aggregates (catalog, order, promo code, gift card,
//!   subscription, user), repository traits, audit sink
//! - **application**: pricing pipeline, booking orchestrator, subscription
//!   manager, audit bus
//! - **infrastructure**: SeaORM entities, migrations and repositories, JWT
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, money helpers, shutdown signal

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::{create_api_router, ApiContext};
