//! HTTP REST API interfaces
//!
//! - `common`: response envelope, `ApiError`, validated JSON extractor
//! - `middleware`: JWT bearer authentication
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext, ApiDoc};
