//! Infrastructure Layer
//!
//! Database implementations of the collaborator traits, plus an in-memory
//! directory for tests and local runs.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDirectory;
pub use postgres::PgDirectory;
