//! PostgreSQL Directory Implementations
//!
//! Read-only lookups against the existing `users`, `roles` and `user_roles`
//! tables. Users are keyed by integer id.

use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{role::Role, user::UserRecord};
use crate::domain::repository::{RoleDirectory, UserDirectory};
use crate::domain::value_object::{role_name::RoleName, subject_id::SubjectId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user and role directory
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Directory Implementation
// ============================================================================

impl UserDirectory for PgDirectory {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                password,
                confirmed
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_record).transpose()
    }
}

// ============================================================================
// Role Directory Implementation
// ============================================================================

impl RoleDirectory for PgDirectory {
    async fn has_role(&self, subject: &SubjectId, role: &RoleName) -> AuthResult<bool> {
        // Claims we issued always carry numeric ids; anything else holds no roles.
        let Some(user_id) = subject.as_numeric() else {
            return Ok(false);
        };

        let held: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = $1 AND lower(r.name) = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(held)
    }

    async fn roles_of(&self, subject: &SubjectId) -> AuthResult<Vec<RoleName>> {
        let Some(user_id) = subject.as_numeric() else {
            return Ok(Vec::new());
        };

        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(RoleName::new).collect())
    }

    async fn list_roles(&self) -> AuthResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| Role::new(r.id, r.name)).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    confirmed: bool,
}

impl UserRow {
    fn into_record(self) -> AuthResult<UserRecord> {
        let password_hash = HashedPassword::from_phc_string(self.password)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash for user {}: {e}", self.id)))?;

        Ok(UserRecord {
            id: SubjectId::from(self.id),
            username: self.username,
            password_hash,
            email_confirmed: self.confirmed,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}
