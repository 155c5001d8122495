//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PgDeviceCatalog;
