//! Repository implementations for all device hive entities.

pub mod access_key;
pub mod command;
pub mod device;
pub mod device_class;
pub mod network;
pub mod notification;
pub mod user;

pub use access_key::PgAccessKeyRepository;
pub use command::PgCommandRepository;
pub use device::PgDeviceRepository;
pub use device_class::PgDeviceClassRepository;
pub use network::PgNetworkRepository;
pub use notification::PgNotificationRepository;
pub use user::PgUserRepository;
