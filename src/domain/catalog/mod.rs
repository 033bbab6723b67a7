//! Catalog aggregate
//!
//! Service types, services and extra services, plus the request-scoped
//! snapshot the pricing pipeline reads from.

pub mod model;
pub mod repository;

pub use model::{
    CatalogSnapshot, ExtraServiceDef, InputType, RelationType, ServiceDef, ServiceTypeDef,
    BEDROOMS_KEY,
};
pub use repository::CatalogRepository;
