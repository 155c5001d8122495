//! Sign In Use Case
//!
//! Checks a username/password pair and issues a short-lived credential.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::domain::entity::claims::Claims;
use crate::domain::repository::{RoleDirectory, UserDirectory};
use crate::domain::value_object::role_name::RoleName;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Signed credential for the cookie
    pub token: String,
    pub claims: Claims,
    pub roles: Vec<RoleName>,
    /// Where the client should go next
    pub landing: String,
}

/// Sign in use case
pub struct SignInUseCase<U, R>
where
    U: UserDirectory,
    R: RoleDirectory,
{
    users: Arc<U>,
    roles: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<U, R> SignInUseCase<U, R>
where
    U: UserDirectory,
    R: RoleDirectory,
{
    pub fn new(
        users: Arc<U>,
        roles: Arc<R>,
        codec: Arc<TokenCodec>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            users,
            roles,
            codec,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: SignInInput,
        now: DateTime<Utc>,
    ) -> AuthResult<SignInOutput> {
        let password = ClearTextPassword::new(&input.password);
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_username(input.username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AuthError::EmailNotConfirmed);
        }

        // Argon2 is deliberately slow; keep it off the async workers.
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification failed: {e}")))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.roles.roles_of(&user.id).await?;
        let landing = if roles.iter().any(RoleName::is_admin) {
            self.config.admin_landing.clone()
        } else {
            self.config.user_landing.clone()
        };

        let claims = Claims::new(
            user.id.clone(),
            Some(user.username.clone()),
            now,
            self.config.token_ttl_delta(),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;
        let token = self.codec.issue(&claims)?;

        tracing::info!(subject = %user.id, landing = %landing, "User signed in");

        Ok(SignInOutput {
            token,
            claims,
            roles,
            landing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::UserRecord;
    use crate::infra::memory::InMemoryDirectory;

    fn use_case(directory: InMemoryDirectory) -> SignInUseCase<InMemoryDirectory, InMemoryDirectory> {
        let directory = Arc::new(directory);
        let config = AuthConfig::with_random_secret();
        let codec = Arc::new(TokenCodec::from_config(&config).unwrap());
        SignInUseCase::new(directory.clone(), directory, codec, Arc::new(config))
    }

    fn record(id: i64, username: &str, password: &str) -> UserRecord {
        let hash = ClearTextPassword::new(password).hash().unwrap();
        UserRecord::new(id, username, hash)
    }

    fn input(username: &str, password: &str) -> SignInInput {
        SignInInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_for_user() {
        let directory = InMemoryDirectory::new();
        directory.insert_user(record(7, "alice", "wonderland"));
        directory.grant(7, RoleName::user());

        let output = use_case(directory)
            .execute(input("alice", "wonderland"))
            .await
            .unwrap();

        assert_eq!(output.claims.subject().as_str(), "7");
        assert_eq!(output.claims.name(), Some("alice"));
        assert_eq!(output.landing, "/user");
        assert!(!output.token.is_empty());
    }

    #[tokio::test]
    async fn test_admin_lands_on_admin_page() {
        let directory = InMemoryDirectory::new();
        directory.insert_user(record(1, "root", "toor-toor"));
        directory.grant(1, RoleName::admin());

        let output = use_case(directory)
            .execute(input("root", "toor-toor"))
            .await
            .unwrap();

        assert_eq!(output.landing, "/admin");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let directory = InMemoryDirectory::new();
        directory.insert_user(record(7, "alice", "wonderland"));
        let use_case = use_case(directory);

        let unknown = use_case.execute(input("bob", "wonderland")).await.unwrap_err();
        let wrong = use_case.execute(input("alice", "looking-glass")).await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unconfirmed_account_is_rejected() {
        let directory = InMemoryDirectory::new();
        directory.insert_user(record(7, "alice", "wonderland").unconfirmed());

        let err = use_case(directory)
            .execute(input("alice", "wonderland"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailNotConfirmed));
    }

    #[tokio::test]
    async fn test_directory_outage_is_collaborator_failure() {
        let directory = InMemoryDirectory::new();
        directory.set_unavailable(true);

        let err = use_case(directory)
            .execute(input("alice", "wonderland"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::CollaboratorUnavailable(_)));
    }
}
