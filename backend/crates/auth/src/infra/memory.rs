//! In-Memory Directory
//!
//! A user and role directory held in process memory. Used by tests and by
//! local runs without a database. Can be switched into a failing mode to
//! exercise collaborator outages.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::domain::entity::{role::Role, user::UserRecord};
use crate::domain::repository::{RoleDirectory, UserDirectory};
use crate::domain::value_object::{role_name::RoleName, subject_id::SubjectId};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
    grants: RwLock<HashMap<SubjectId, Vec<RoleName>>>,
    /// Role catalogue keyed by id
    roles: RwLock<BTreeMap<i64, RoleName>>,
    unavailable: AtomicBool,
}

impl InMemoryDirectory {
    /// Directory with the `admin` (1) and `user` (2) roles defined
    pub fn new() -> Self {
        let directory = Self::default();
        directory.define_role(Role::new(1, RoleName::ADMIN));
        directory.define_role(Role::new(2, RoleName::USER));
        directory
    }

    pub fn insert_user(&self, user: UserRecord) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.username.clone(), user);
    }

    pub fn define_role(&self, role: Role) {
        self.roles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(role.id, role.name);
    }

    pub fn grant(&self, subject: impl Into<SubjectId>, role: RoleName) {
        let mut grants = self.grants.write().unwrap_or_else(PoisonError::into_inner);
        let held = grants.entry(subject.into()).or_default();
        if !held.contains(&role) {
            held.push(role);
        }
    }

    /// Make every lookup fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AuthResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::CollaboratorUnavailable(
                "in-memory directory switched off".to_string(),
            ));
        }
        Ok(())
    }
}

impl UserDirectory for InMemoryDirectory {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserRecord>> {
        self.ensure_available()?;
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(username).cloned())
    }
}

impl RoleDirectory for InMemoryDirectory {
    async fn has_role(&self, subject: &SubjectId, role: &RoleName) -> AuthResult<bool> {
        self.ensure_available()?;
        let grants = self.grants.read().unwrap_or_else(PoisonError::into_inner);
        Ok(grants
            .get(subject)
            .is_some_and(|held| held.contains(role)))
    }

    async fn roles_of(&self, subject: &SubjectId) -> AuthResult<Vec<RoleName>> {
        self.ensure_available()?;
        let grants = self.grants.read().unwrap_or_else(PoisonError::into_inner);
        Ok(grants.get(subject).cloned().unwrap_or_default())
    }

    async fn list_roles(&self) -> AuthResult<Vec<Role>> {
        self.ensure_available()?;
        let roles = self.roles.read().unwrap_or_else(PoisonError::into_inner);
        Ok(roles
            .iter()
            .map(|(id, name)| Role {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grants_are_per_subject() {
        let directory = InMemoryDirectory::new();
        directory.grant(1, RoleName::admin());
        directory.grant(7, RoleName::user());

        assert!(directory.has_role(&SubjectId::from(1), &RoleName::admin()).await.unwrap());
        assert!(!directory.has_role(&SubjectId::from(7), &RoleName::admin()).await.unwrap());
        assert!(!directory.has_role(&SubjectId::from(99), &RoleName::user()).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let directory = InMemoryDirectory::new();
        directory.grant(7, RoleName::user());
        directory.grant(7, RoleName::new("USER"));

        let roles = directory.roles_of(&SubjectId::from(7)).await.unwrap();
        assert_eq!(roles, vec![RoleName::user()]);
    }

    #[tokio::test]
    async fn test_catalogue_is_ordered_by_id() {
        let directory = InMemoryDirectory::new();
        directory.define_role(Role::new(0, "auditor"));

        let names: Vec<_> = directory
            .list_roles()
            .await
            .unwrap()
            .into_iter()
            .map(|role| role.name.to_string())
            .collect();
        assert_eq!(names, vec!["auditor", "admin", "user"]);
    }

    #[tokio::test]
    async fn test_unavailable_directory_fails() {
        let directory = InMemoryDirectory::new();
        directory.set_unavailable(true);

        let err = directory
            .has_role(&SubjectId::from(1), &RoleName::admin())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CollaboratorUnavailable(_)));
    }
}
