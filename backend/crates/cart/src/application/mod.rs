//! Application Layer

pub mod add_device;
pub mod store;

pub use add_device::AddDeviceUseCase;
pub use store::CartStore;
