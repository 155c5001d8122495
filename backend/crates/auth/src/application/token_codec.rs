//! Credential Token Codec
//!
//! Credentials are `<payload>.<signature>` where the payload is the
//! base64url JSON of [`Claims`] and the signature is the base64url
//! HMAC-SHA256 of the payload text. The signature is checked before the
//! payload is decoded, so nothing unauthenticated is ever parsed.

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::entity::claims::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token has expired")]
    Expired,

    #[error("No signing key configured")]
    MissingKey,

    #[error("Failed to encode claims: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Issues and verifies signed credentials under one secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    /// An empty or all-zero secret is treated as no key at all.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.iter().all(|b| *b == 0) {
            return Err(TokenError::MissingKey);
        }
        Ok(Self {
            secret: secret.to_vec(),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        Self::new(&config.token_secret)
    }

    /// Encode and sign `claims`
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let payload = to_base64url(&serde_json::to_vec(claims)?);
        let signature = to_base64url(&hmac_sha256(&self.secret, payload.as_bytes()));
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() {
            return Err(TokenError::Malformed);
        }

        let signature = from_base64url(signature).map_err(|_| TokenError::SignatureInvalid)?;
        if !verify_hmac_sha256(&self.secret, payload.as_bytes(), &signature) {
            return Err(TokenError::SignatureInvalid);
        }

        let json = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;
        claims.validate().map_err(|_| TokenError::Malformed)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
