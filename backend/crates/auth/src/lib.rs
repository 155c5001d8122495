//! Auth (Authentication and Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Claims, identities, collaborator traits
//! - `application/` - Token codec and the sign-in use case
//! - `infra/` - PostgreSQL and in-memory directories
//! - `presentation/` - Gates, HTTP handlers, DTOs, router
//!
//! ## Request Gates
//! Guarded routes run a [`GateChain`] before the handler:
//! - admission control against a process-wide token bucket (429)
//! - credential verification from the `token` cookie (401)
//! - role membership through a [`RoleDirectory`] (403)
//!
//! ## Security Model
//! - Credentials are HMAC-SHA256 signed claims with a short lifetime
//! - All credential failures produce the same externally visible 401
//! - Passwords verified against Argon2id hashes
//! - Logout clears the cookie only; there is no revocation list

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{AuthConfig, TokenCodec, TokenError};
pub use domain::{
    Claims, Identity, Role, RoleDirectory, RoleName, SubjectId, UserDirectory, UserRecord,
};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryDirectory, PgDirectory};
pub use presentation::{CurrentIdentity, Gate, GateChain, GateSet};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
