//! Cart Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Devices and the catalog trait
//! - `application/` - The in-memory cart store and use cases
//! - `infra/` - PostgreSQL and in-memory device catalogs
//! - `presentation/` - HTTP handlers
//!
//! Carts live in process memory keyed by the authenticated subject and are
//! lost on restart. Every cart route requires a valid credential.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::store::CartStore;
pub use domain::entities::Device;
pub use domain::repository::DeviceCatalog;
pub use error::{CartError, CartResult};
pub use infra::{memory::InMemoryCatalog, postgres::PgDeviceCatalog};
pub use presentation::router::{cart_router, cart_router_generic};
