//! Domain Layer
//!
//! Contains entities, value objects, and the catalog trait.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::Device;
pub use repository::DeviceCatalog;
pub use value_objects::DeviceId;
