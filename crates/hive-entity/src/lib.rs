//! # hive-entity
//!
//! Domain entity models for the device hive, the authenticated
//! [`Principal`](principal::Principal), and the per-entity storage
//! contracts every backend implements.

pub mod access_key;
pub mod command;
pub mod device;
pub mod device_class;
pub mod network;
pub mod notification;
pub mod principal;
pub mod repository;
pub mod user;

pub use access_key::{AccessKey, AccessKeyPermission, actions};
pub use command::{Command, CommandUpdate};
pub use device::{Device, DeviceFilter, DeviceSortField};
pub use device_class::{DeviceClass, Equipment};
pub use network::{Network, NetworkFilter, NetworkSortField, NetworkUpdate};
pub use notification::Notification;
pub use principal::{Principal, PrincipalRole};
pub use repository::Storage;
pub use user::{User, UserRole};
