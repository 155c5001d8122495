//! Add Device Use Case
//!
//! Resolves a device through the catalog and appends it to the caller's cart.

use std::sync::Arc;

use auth::SubjectId;

use crate::application::store::CartStore;
use crate::domain::entities::Device;
use crate::domain::repository::DeviceCatalog;
use crate::domain::value_objects::DeviceId;
use crate::error::{CartError, CartResult};

pub struct AddDeviceUseCase<C>
where
    C: DeviceCatalog,
{
    catalog: Arc<C>,
    store: Arc<CartStore>,
}

impl<C> AddDeviceUseCase<C>
where
    C: DeviceCatalog,
{
    pub fn new(catalog: Arc<C>, store: Arc<CartStore>) -> Self {
        Self { catalog, store }
    }

    /// Returns the cart after the append
    pub async fn execute(&self, owner: &SubjectId, raw_id: i64) -> CartResult<Vec<Device>> {
        let id = DeviceId::new(raw_id).ok_or(CartError::InvalidDeviceId(raw_id))?;

        let device = self
            .catalog
            .find_device(id)
            .await?
            .ok_or(CartError::DeviceNotFound(raw_id))?;

        let size = self.store.append(owner, device);
        tracing::info!(subject = %owner, device_id = raw_id, cart_size = size, "Device added to cart");

        Ok(self.store.snapshot(owner))
    }
}
