//! Authentication Gate
//!
//! Verifies the credential cookie and attaches the caller's [`Identity`]
//! to the request. Handlers behind the gate read it with
//! [`CurrentIdentity`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use platform::cookie::extract_cookie;

use crate::application::token_codec::TokenCodec;
use crate::domain::entity::identity::Identity;
use crate::error::AuthError;
use crate::presentation::middleware::chain::Gate;

pub struct AuthGate {
    codec: Arc<TokenCodec>,
    cookie_name: String,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>, cookie_name: impl Into<String>) -> Self {
        Self {
            codec,
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl Gate for AuthGate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn intercept(&self, parts: &mut Parts) -> Result<(), AuthError> {
        let token =
            extract_cookie(&parts.headers, &self.cookie_name).ok_or(AuthError::CredentialMissing)?;
        let claims = self.codec.verify(&token)?;

        tracing::debug!(subject = %claims.subject(), "Credential verified");
        parts.extensions.insert(Identity::from(claims));
        Ok(())
    }
}

/// Extractor for the identity attached by [`AuthGate`]
///
/// Rejects with 401 on routes that are not behind the gate.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(AuthError::CredentialMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::claims::Claims;
    use crate::domain::value_object::subject_id::SubjectId;
    use axum::http::{Request, header};
    use chrono::{TimeDelta, Utc};

    fn gate() -> (AuthGate, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(&[9u8; 32]).unwrap());
        (AuthGate::new(codec.clone(), "token"), codec)
    }

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_valid_credential_attaches_identity() {
        let (gate, codec) = gate();
        let claims =
            Claims::new(SubjectId::from(7), None, Utc::now(), TimeDelta::minutes(5)).unwrap();
        let token = codec.issue(&claims).unwrap();
        let mut parts = parts_with_cookie(Some(&format!("token={token}")));

        gate.intercept(&mut parts).await.unwrap();

        let identity = parts.extensions.get::<Identity>().unwrap();
        assert_eq!(identity.subject, SubjectId::from(7));
    }

    #[tokio::test]
    async fn test_missing_cookie() {
        let (gate, _) = gate();
        let err = gate.intercept(&mut parts_with_cookie(None)).await.unwrap_err();
        assert!(matches!(err, AuthError::CredentialMissing));
    }

    #[tokio::test]
    async fn test_expired_credential() {
        let (gate, codec) = gate();
        let issued = Utc::now() - TimeDelta::minutes(10);
        let claims = Claims::new(SubjectId::from(7), None, issued, TimeDelta::minutes(5)).unwrap();
        let token = codec.issue(&claims).unwrap();
        let mut parts = parts_with_cookie(Some(&format!("token={token}")));

        let err = gate.intercept(&mut parts).await.unwrap_err();
        assert!(matches!(err, AuthError::CredentialExpired));
        assert!(parts.extensions.get::<Identity>().is_none());
    }

    #[tokio::test]
    async fn test_garbage_credential() {
        let (gate, _) = gate();
        let mut parts = parts_with_cookie(Some("token=garbage"));

        let err = gate.intercept(&mut parts).await.unwrap_err();
        assert!(matches!(err, AuthError::CredentialMalformed));
    }

    #[tokio::test]
    async fn test_extractor_without_gate_rejects() {
        let mut parts = parts_with_cookie(None);
        let err = CurrentIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CredentialMissing));
    }
}
