//! Auth Router
//!
//! Every route sits behind at least the admission gate.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::domain::repository::{RoleDirectory, UserDirectory};
use crate::domain::value_object::role_name::RoleName;
use crate::infra::postgres::PgDirectory;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::GateSet;

/// Create the Auth router with the PostgreSQL directory
pub fn auth_router(
    directory: PgDirectory,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
    gates: &GateSet,
) -> Router {
    let directory = Arc::new(directory);
    auth_router_generic(directory.clone(), directory, codec, config, gates)
}

/// Create a generic Auth router for any directory implementation
///
/// Routes are relative: `/auth/login`, `/auth/logout`, `/me`, `/admin`.
pub fn auth_router_generic<U, R>(
    users: Arc<U>,
    roles: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
    gates: &GateSet,
) -> Router
where
    U: UserDirectory + Send + Sync + 'static,
    R: RoleDirectory + Send + Sync + 'static,
{
    let state = AuthAppState {
        users,
        roles: roles.clone(),
        codec,
        config,
    };

    let public = gates.public().guard(
        Router::new()
            .route("/auth/login", post(handlers::sign_in::<U, R>))
            .route("/auth/logout", post(handlers::sign_out::<U, R>)),
    );

    let authenticated = gates
        .authenticated()
        .guard(Router::new().route("/me", get(handlers::me)));

    let admin = gates.with_role(roles, RoleName::admin()).guard(
        Router::new().route("/admin", get(handlers::admin_overview::<U, R>)),
    );

    public.merge(authenticated).merge(admin).with_state(state)
}
