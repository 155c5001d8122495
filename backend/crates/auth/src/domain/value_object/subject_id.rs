use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an authenticated subject
///
/// Carried inside signed claims as a string. Storage backends that key users
/// by integer ids convert with [`SubjectId::as_numeric`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, if the id is a plain integer
    pub fn as_numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids() {
        assert_eq!(SubjectId::from(42).as_numeric(), Some(42));
        assert_eq!(SubjectId::from("alice").as_numeric(), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&SubjectId::from(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
