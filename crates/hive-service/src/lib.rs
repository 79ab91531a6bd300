//! # hive-service
//!
//! Domain services shared by the WebSocket and REST surfaces: the
//! [`DeviceDirectory`] (identity and visibility), [`DeviceService`]
//! (registration, commands, notifications) and [`NetworkService`].

pub mod device_service;
pub mod directory;
pub mod network_service;
pub mod view;

pub use device_service::{
    CommandDraft, DEFAULT_CLASS_VERSION, DeviceClassRef, DeviceRegistration, DeviceService,
    NetworkRef,
};
pub use directory::DeviceDirectory;
pub use network_service::{NetworkDetail, NetworkQuery, NetworkService};
pub use view::{DeviceView, NetworkView};
