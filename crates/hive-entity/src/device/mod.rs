//! Device domain entities.

pub mod filter;
pub mod model;

pub use filter::{DeviceFilter, DeviceSortField};
pub use model::Device;
