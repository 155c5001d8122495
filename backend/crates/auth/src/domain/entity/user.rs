//! User Entity
//!
//! What login needs to know about a stored account.

use platform::password::HashedPassword;

use crate::domain::value_object::subject_id::SubjectId;

/// Stored account as seen by the user directory
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Subject id that ends up in issued claims
    pub id: SubjectId,
    pub username: String,
    /// Argon2id hash in PHC format
    pub password_hash: HashedPassword,
    /// Accounts must confirm their email before they can log in
    pub email_confirmed: bool,
}

impl UserRecord {
    pub fn new(
        id: impl Into<SubjectId>,
        username: impl Into<String>,
        password_hash: HashedPassword,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password_hash,
            email_confirmed: true,
        }
    }

    pub fn unconfirmed(mut self) -> Self {
        self.email_confirmed = false;
        self
    }

    #[inline]
    pub fn can_login(&self) -> bool {
        self.email_confirmed
    }
}
