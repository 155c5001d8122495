//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;

use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::application::{SignInInput, SignInUseCase};
use crate::domain::repository::{RoleDirectory, UserDirectory};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AdminOverviewResponse, IdentityResponse, RoleResponse, SignInRequest, SignInResponse,
};
use crate::presentation::middleware::CurrentIdentity;

/// Shared state for auth handlers
pub struct AuthAppState<U, R> {
    pub users: Arc<U>,
    pub roles: Arc<R>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

impl<U, R> Clone for AuthAppState<U, R> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            roles: self.roles.clone(),
            codec: self.codec.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<U, R>(
    State(state): State<AuthAppState<U, R>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    U: UserDirectory + Send + Sync + 'static,
    R: RoleDirectory + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| AuthError::InvalidRequest(e.body_text()))?;

    let use_case = SignInUseCase::new(
        state.users.clone(),
        state.roles.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    // Cookie lifetime matches the credential lifetime
    let cookie = state
        .config
        .cookie
        .set_cookie_header(&output.token, state.config.token_ttl)
        .map_err(|e| AuthError::Internal(format!("Invalid cookie value: {e}")))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            user_id: output.claims.subject().to_string(),
            username: output.claims.name().unwrap_or_default().to_string(),
            roles: output.roles.iter().map(ToString::to_string).collect(),
            landing: output.landing,
            expires_at: output.claims.expires_at(),
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/logout
///
/// Clears the cookie. Credentials are stateless, so a copy kept elsewhere
/// stays valid until it expires.
pub async fn sign_out<U, R>(
    State(state): State<AuthAppState<U, R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    U: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    if let Some(token) = platform::cookie::extract_cookie(&headers, &state.config.cookie.name) {
        if let Ok(claims) = state.codec.verify(&token) {
            tracing::info!(subject = %claims.subject(), "User signed out");
        }
    }

    let cookie = state
        .config
        .cookie
        .delete_cookie_header()
        .map_err(|e| AuthError::Internal(format!("Invalid cookie value: {e}")))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Identity
// ============================================================================

/// GET /api/me
pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<IdentityResponse> {
    Json(identity.into())
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin
pub async fn admin_overview<U, R>(
    State(state): State<AuthAppState<U, R>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> AuthResult<Json<AdminOverviewResponse>>
where
    U: Send + Sync + 'static,
    R: RoleDirectory + Send + Sync + 'static,
{
    let roles = state.roles.list_roles().await?;

    tracing::debug!(subject = %identity.subject, "Admin overview served");

    Ok(Json(AdminOverviewResponse {
        viewer: identity.into(),
        roles: roles.into_iter().map(RoleResponse::from).collect(),
    }))
}
