//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::Device;

/// Add to cart request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceRequest {
    pub device_id: i64,
}

/// Cart contents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<Device>,
    pub count: usize,
}

impl From<Vec<Device>> for CartResponse {
    fn from(items: Vec<Device>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}
