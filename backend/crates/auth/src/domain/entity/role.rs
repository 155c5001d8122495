//! Role Entity

use serde::Serialize;

use crate::domain::value_object::role_name::RoleName;

/// A role known to the role directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: RoleName,
}

impl Role {
    pub fn new(id: i64, name: impl AsRef<str>) -> Self {
        Self {
            id,
            name: RoleName::new(name),
        }
    }
}
