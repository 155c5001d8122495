//! Domain Entities

use serde::Serialize;

use crate::domain::value_objects::DeviceId;

/// An item of the electronics catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    /// Device category, e.g. "phone" or "laptop"
    pub kind: String,
    pub brand: String,
    pub model: String,
}

impl Device {
    pub fn new(
        id: DeviceId,
        kind: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            brand: brand.into(),
            model: model.into(),
        }
    }
}
