//! Fixtures shared by the service tests.

#![allow(dead_code)]

use hive_core::traits::Repository;
use hive_entity::repository::UserRepository;
use hive_entity::{Device, Network, Storage, User, UserRole};
use hive_kv::KvStore;

pub fn storage() -> Storage {
    KvStore::new().storage()
}

pub async fn network(storage: &Storage, name: &str) -> Network {
    storage.networks.persist(Network::named(name)).await.unwrap()
}

pub async fn device(storage: &Storage, guid: &str, network: Option<&Network>) -> Device {
    let mut device = Device::new(guid, format!("{guid}-key"), guid.to_uppercase());
    device.network_id = network.and_then(|n| n.id);
    storage.devices.persist(device).await.unwrap()
}

pub async fn user(storage: &Storage, login: &str, role: UserRole, grants: &[&Network]) -> User {
    let user = storage.users.persist(User::new(login, role)).await.unwrap();
    for network in grants {
        storage
            .users
            .grant_network(user.id.unwrap(), network.id.unwrap())
            .await
            .unwrap();
    }
    user
}

pub fn guids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
