//! Collaborator Traits
//!
//! Read-only lookups the gates and use cases depend on. Implementations live
//! in the infrastructure layer.

use crate::domain::entity::{role::Role, user::UserRecord};
use crate::domain::value_object::{role_name::RoleName, subject_id::SubjectId};
use crate::error::AuthResult;

/// User lookup for login
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Find an account by its login name
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserRecord>>;
}

/// Role membership
#[trait_variant::make(RoleDirectory: Send)]
pub trait LocalRoleDirectory {
    /// Whether `subject` holds `role`
    async fn has_role(&self, subject: &SubjectId, role: &RoleName) -> AuthResult<bool>;

    /// All roles held by `subject`
    async fn roles_of(&self, subject: &SubjectId) -> AuthResult<Vec<RoleName>>;

    /// Every role the directory knows about
    async fn list_roles(&self) -> AuthResult<Vec<Role>>;
}
