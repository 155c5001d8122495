//! Domain Layer
//!
//! Contains entities, value objects, and the collaborator traits the
//! gates and use cases depend on.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    claims::Claims, identity::Identity, role::Role, user::UserRecord,
};
pub use repository::{RoleDirectory, UserDirectory};
pub use value_object::{role_name::RoleName, subject_id::SubjectId};
