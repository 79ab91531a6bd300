//! Repository implementations over the [`Keyspace`](crate::Keyspace).

pub mod access_key;
pub mod command;
pub mod device;
pub mod device_class;
pub mod network;
pub mod notification;
pub mod user;

pub use access_key::KvAccessKeyRepository;
pub use command::KvCommandRepository;
pub use device::KvDeviceRepository;
pub use device_class::KvDeviceClassRepository;
pub use network::KvNetworkRepository;
pub use notification::KvNotificationRepository;
pub use user::KvUserRepository;

use std::cmp::Ordering;

use hive_core::types::SortDirection;

/// Order by `primary` in `direction`, breaking ties by ascending id.
pub(crate) fn ordered<K: Ord>(
    primary: (K, K),
    ids: (Option<i64>, Option<i64>),
    direction: SortDirection,
) -> Ordering {
    let by_field = if direction.is_asc() {
        primary.0.cmp(&primary.1)
    } else {
        primary.1.cmp(&primary.0)
    };
    by_field.then(ids.0.cmp(&ids.1))
}
