//! Repository Traits

use crate::domain::entities::Device;
use crate::domain::value_objects::DeviceId;
use crate::error::CartResult;

/// Device catalog lookup
#[trait_variant::make(DeviceCatalog: Send)]
pub trait LocalDeviceCatalog {
    async fn find_device(&self, id: DeviceId) -> CartResult<Option<Device>>;
}
