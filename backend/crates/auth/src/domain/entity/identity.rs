//! Identity Entity
//!
//! What a request carries once its credential has been verified.

use chrono::{DateTime, Utc};

use crate::domain::entity::claims::Claims;
use crate::domain::value_object::subject_id::SubjectId;

/// Verified caller, attached to request extensions by the authentication gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: SubjectId,
    pub name: Option<String>,
    /// When the credential stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        let expires_at = claims.expires_at();
        let name = claims.name().map(str::to_string);
        Self {
            subject: claims.subject().clone(),
            name,
            expires_at,
        }
    }
}
