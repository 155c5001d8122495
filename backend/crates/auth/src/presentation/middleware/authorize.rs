//! Role Gate
//!
//! Admits only callers holding a given role. Must run after the
//! authentication gate; without an identity the request is treated as
//! unauthenticated.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::RoleDirectory;
use crate::domain::value_object::role_name::RoleName;
use crate::error::AuthError;
use crate::presentation::middleware::chain::Gate;

pub struct RoleGate<R> {
    roles: Arc<R>,
    required: RoleName,
}

impl<R> RoleGate<R> {
    pub fn new(roles: Arc<R>, required: RoleName) -> Self {
        Self { roles, required }
    }
}

#[async_trait]
impl<R> Gate for RoleGate<R>
where
    R: RoleDirectory + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "authorize"
    }

    async fn intercept(&self, parts: &mut Parts) -> Result<(), AuthError> {
        let subject = parts
            .extensions
            .get::<Identity>()
            .map(|identity| identity.subject.clone())
            .ok_or(AuthError::CredentialMissing)?;

        match self.roles.has_role(&subject, &self.required).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::AuthorizationDenied {
                role: self.required.to_string(),
            }),
            Err(AuthError::CollaboratorUnavailable(msg)) => {
                Err(AuthError::CollaboratorUnavailable(msg))
            }
            Err(other) => Err(AuthError::CollaboratorUnavailable(other.to_string())),
        }
    }
}
