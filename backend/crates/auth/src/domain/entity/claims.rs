//! Claims Entity
//!
//! The signed statement carried by a credential: who the subject is and the
//! window in which the statement holds. Timestamps are whole unix seconds so
//! a decoded credential reproduces the issued claims exactly.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_object::subject_id::SubjectId;

/// Rejected claim construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("Claims must expire after they are issued")]
    InvalidLifetime,

    #[error("Claim timestamp out of range")]
    TimestampOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    sub: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    iat: i64,
    exp: i64,
}

impl Claims {
    /// Claims for `subject` valid from `issued_at` for `ttl`
    pub fn new(
        subject: SubjectId,
        name: Option<String>,
        issued_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<Self, ClaimsError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(ClaimsError::TimestampOutOfRange)?;
        Self::from_parts(subject, name, issued_at.timestamp(), expires_at.timestamp())
    }

    /// Claims from raw unix-second timestamps
    pub fn from_parts(
        subject: SubjectId,
        name: Option<String>,
        iat: i64,
        exp: i64,
    ) -> Result<Self, ClaimsError> {
        let claims = Self {
            sub: subject,
            name,
            iat,
            exp,
        };
        claims.validate()?;
        Ok(claims)
    }

    /// Check the lifetime invariant; decoded claims bypass the constructors
    pub fn validate(&self) -> Result<(), ClaimsError> {
        if self.exp <= self.iat {
            return Err(ClaimsError::InvalidLifetime);
        }
        if DateTime::from_timestamp(self.iat, 0).is_none()
            || DateTime::from_timestamp(self.exp, 0).is_none()
        {
            return Err(ClaimsError::TimestampOutOfRange);
        }
        Ok(())
    }

    #[inline]
    pub fn subject(&self) -> &SubjectId {
        &self.sub
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Claims stop holding at the expiry instant itself
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_new_sets_window() {
        let claims = Claims::new(
            SubjectId::from(7),
            Some("alice".to_string()),
            at(1_000),
            TimeDelta::minutes(5),
        )
        .unwrap();

        assert_eq!(claims.subject().as_str(), "7");
        assert_eq!(claims.name(), Some("alice"));
        assert_eq!(claims.issued_at(), at(1_000));
        assert_eq!(claims.expires_at(), at(1_300));
    }

    #[test]
    fn test_lifetime_must_be_positive() {
        let err = Claims::new(SubjectId::from(7), None, at(1_000), TimeDelta::zero()).unwrap_err();
        assert_eq!(err, ClaimsError::InvalidLifetime);

        let err = Claims::from_parts(SubjectId::from(7), None, 1_000, 999).unwrap_err();
        assert_eq!(err, ClaimsError::InvalidLifetime);
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::from_parts(SubjectId::from(7), None, 1_000, 1_300).unwrap();

        assert!(!claims.is_expired_at(at(1_000)));
        assert!(!claims.is_expired_at(at(1_299)));
        assert!(claims.is_expired_at(at(1_300)));
        assert!(claims.is_expired_at(at(5_000)));
    }

    #[test]
    fn test_json_shape() {
        let claims = Claims::from_parts(SubjectId::from(7), None, 1, 2).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json, serde_json::json!({ "sub": "7", "iat": 1, "exp": 2 }));
    }
}
