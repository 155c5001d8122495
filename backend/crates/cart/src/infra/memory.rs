//! In-Memory Device Catalog
//!
//! Fixed catalog for tests and local runs. Can be switched into a failing
//! mode to exercise catalog outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::entities::Device;
use crate::domain::repository::DeviceCatalog;
use crate::domain::value_objects::DeviceId;
use crate::error::{CartError, CartResult};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    devices: HashMap<DeviceId, Device>,
    unavailable: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        Self {
            devices: devices.into_iter().map(|d| (d.id, d)).collect(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Three devices with ids 1 to 3
    pub fn sample() -> Self {
        let device = |id, kind, brand, model| {
            DeviceId::new(id).map(|id| Device::new(id, kind, brand, model))
        };
        Self::new(
            [
                device(1, "phone", "Fairphone", "5"),
                device(2, "laptop", "Framework", "13"),
                device(3, "tablet", "Lenovo", "Tab P12"),
            ]
            .into_iter()
            .flatten(),
        )
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl DeviceCatalog for InMemoryCatalog {
    async fn find_device(&self, id: DeviceId) -> CartResult<Option<Device>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CartError::CatalogUnavailable(
                "in-memory catalog switched off".to_string(),
            ));
        }
        Ok(self.devices.get(&id).cloned())
    }
}
