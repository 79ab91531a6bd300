//! The shared in-memory keyspace.

use std::collections::HashSet;

use dashmap::DashMap;

use hive_entity::{AccessKey, Command, Device, DeviceClass, Network, Notification, User};

use crate::counters::Counters;

/// All buckets of one store.
#[derive(Debug, Default)]
pub struct Keyspace {
    pub counters: Counters,
    pub devices: DashMap<i64, Device>,
    /// guid → device id
    pub device_guids: DashMap<String, i64>,
    pub networks: DashMap<i64, Network>,
    /// network name → network id; owned by the network repository
    pub network_names: DashMap<String, i64>,
    pub device_classes: DashMap<i64, DeviceClass>,
    pub commands: DashMap<i64, Command>,
    pub notifications: DashMap<i64, Notification>,
    pub users: DashMap<i64, User>,
    /// user id → granted network ids
    pub user_networks: DashMap<i64, HashSet<i64>>,
    pub access_keys: DashMap<i64, AccessKey>,
}

impl Keyspace {
    /// Pick the id for a persist: the entity's own id, or the next counter
    /// value when it has none.
    pub(crate) fn assign_id(&self, counter: &'static str, id: Option<i64>) -> i64 {
        match id {
            Some(id) => {
                self.counters.observe(counter, id);
                id
            }
            None => self.counters.next(counter),
        }
    }

    /// Snapshot every value of a bucket.
    pub(crate) fn scan<V: Clone>(bucket: &DashMap<i64, V>) -> Vec<V> {
        bucket.iter().map(|entry| entry.value().clone()).collect()
    }

    pub(crate) fn network_id_by_name(&self, name: &str) -> Option<i64> {
        self.network_names.get(name).map(|id| *id)
    }

    pub(crate) fn device_class_ids_by_name(&self, name: &str) -> HashSet<i64> {
        self.device_classes
            .iter()
            .filter(|entry| entry.value().name == name)
            .filter_map(|entry| entry.value().id)
            .collect()
    }
}
