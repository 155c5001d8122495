//! Auth Error Types
//!
//! Every way a guarded request can be turned away, plus the login failures.
//! Variants integrate with the unified `kernel::error::AppError` system for
//! the response body.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token_codec::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shared by every credential rejection, so callers cannot tell
/// a missing credential from a forged or expired one.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Marks credential rejections for clients that redirect to login
pub const AUTH_REQUIRED_HEADER: HeaderName = HeaderName::from_static("x-auth-required");

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Admission control refused the request
    #[error("Rate limit exceeded")]
    AdmissionDenied { retry_after: Option<Duration> },

    /// No credential cookie on the request
    #[error("Credential missing")]
    CredentialMissing,

    /// Credential could not be parsed
    #[error("Credential malformed")]
    CredentialMalformed,

    /// Credential was genuine but has expired
    #[error("Credential expired")]
    CredentialExpired,

    /// Credential signature did not verify
    #[error("Credential signature invalid")]
    CredentialForged,

    /// Authenticated, but lacking the required role
    #[error("Role {role} required")]
    AuthorizationDenied { role: String },

    /// Unknown user or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Account exists but its email is not confirmed yet
    #[error("Please confirm your email first")]
    EmailNotConfirmed,

    /// Request body could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A collaborator (database, directory) failed
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AdmissionDenied { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::CredentialMissing
            | AuthError::CredentialMalformed
            | AuthError::CredentialExpired
            | AuthError::CredentialForged
            | AuthError::InvalidCredentials
            | AuthError::EmailNotConfirmed => StatusCode::UNAUTHORIZED,
            AuthError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::CollaboratorUnavailable(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AdmissionDenied { .. } => ErrorKind::TooManyRequests,
            AuthError::CredentialMissing
            | AuthError::CredentialMalformed
            | AuthError::CredentialExpired
            | AuthError::CredentialForged
            | AuthError::InvalidCredentials
            | AuthError::EmailNotConfirmed => ErrorKind::Unauthorized,
            AuthError::AuthorizationDenied { .. } => ErrorKind::Forbidden,
            AuthError::InvalidRequest(_) => ErrorKind::BadRequest,
            AuthError::CollaboratorUnavailable(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Whether this is one of the credential rejections
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::CredentialMissing
                | AuthError::CredentialMalformed
                | AuthError::CredentialExpired
                | AuthError::CredentialForged
        )
    }

    /// Convert to AppError
    ///
    /// Credential rejections collapse to one message and server-side
    /// failures never expose their detail.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::AdmissionDenied { .. } => AppError::too_many_requests(self.to_string())
                .with_action("Retry after the delay in the Retry-After header"),
            e if e.is_credential_failure() => AppError::unauthorized(UNAUTHORIZED_MESSAGE),
            AuthError::AuthorizationDenied { .. } => AppError::forbidden("Forbidden"),
            AuthError::CollaboratorUnavailable(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::AdmissionDenied { retry_after } => {
                tracing::warn!(retry_after = ?retry_after, "Request rejected by rate limiter");
            }
            AuthError::CredentialMissing => {
                tracing::debug!("Request without credential");
            }
            AuthError::CredentialMalformed => {
                tracing::info!("Malformed credential presented");
            }
            AuthError::CredentialExpired => {
                tracing::debug!("Expired credential presented");
            }
            AuthError::CredentialForged => {
                tracing::warn!("Credential with invalid signature presented");
            }
            AuthError::AuthorizationDenied { role } => {
                tracing::warn!(role = %role, "Authorization denied");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::EmailNotConfirmed => {
                tracing::info!("Login attempt on unconfirmed account");
            }
            AuthError::InvalidRequest(reason) => {
                tracing::debug!(reason = %reason, "Unreadable request body");
            }
            AuthError::CollaboratorUnavailable(msg) => {
                tracing::error!(message = %msg, "Auth collaborator unavailable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let mut response = self.to_app_error().into_response();
        let headers = response.headers_mut();
        match &self {
            AuthError::AdmissionDenied {
                retry_after: Some(wait),
            } => {
                // Round up so clients never retry before a token is back.
                let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                headers.insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            }
            e if e.is_credential_failure() => {
                headers.insert(AUTH_REQUIRED_HEADER, HeaderValue::from_static("true"));
            }
            _ => {}
        }
        response
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::CollaboratorUnavailable(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::CredentialMalformed,
            TokenError::SignatureInvalid => AuthError::CredentialForged,
            TokenError::Expired => AuthError::CredentialExpired,
            TokenError::MissingKey | TokenError::Encoding(_) => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::AdmissionDenied { retry_after: None }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AuthError::CredentialForged.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::AuthorizationDenied {
                role: "admin".into()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::CollaboratorUnavailable("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_credential_failures_are_indistinguishable() {
        let mut bodies = Vec::new();
        for err in [
            AuthError::CredentialMissing,
            AuthError::CredentialMalformed,
            AuthError::CredentialExpired,
            AuthError::CredentialForged,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(response.headers()[AUTH_REQUIRED_HEADER], "true");
            bodies.push(body_json(response).await);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(bodies[0]["detail"], UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_exposed() {
        let response = AuthError::CollaboratorUnavailable("password=hunter2".into()).into_response();
        let body = body_json(response).await;

        assert!(!body.to_string().contains("hunter2"));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let response = AuthError::AdmissionDenied {
            retry_after: Some(Duration::from_millis(1_200)),
        }
        .into_response();

        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }

    #[tokio::test]
    async fn test_rate_limited_body_tells_caller_to_wait() {
        let response = AuthError::AdmissionDenied {
            retry_after: Some(Duration::from_secs(1)),
        }
        .into_response();

        let body = body_json(response).await;
        assert_eq!(body["status"], 429);
        assert!(body["action"].as_str().unwrap().contains("Retry-After"));
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            AuthError::from(TokenError::SignatureInvalid),
            AuthError::CredentialForged
        ));
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::CredentialExpired
        ));
        assert!(matches!(
            AuthError::from(TokenError::Malformed),
            AuthError::CredentialMalformed
        ));
    }
}
