//! Network repository.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::{Page, Sort};
use hive_core::AppError;
use hive_entity::repository::NetworkRepository;
use hive_entity::{Network, NetworkFilter, NetworkSortField};

use super::ordered;
use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvNetworkRepository {
    ks: Arc<Keyspace>,
}

impl KvNetworkRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<Network, i64> for KvNetworkRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Network>> {
        Ok(self.ks.networks.get(&id).map(|n| n.value().clone()))
    }

    async fn persist(&self, mut network: Network) -> AppResult<Network> {
        let previous_name = network
            .id
            .and_then(|id| self.ks.networks.get(&id).map(|n| n.name.clone()));

        // Claiming the name and assigning the id happen under one index
        // entry, so two creates of the same name cannot both succeed.
        let id = match self.ks.network_names.entry(network.name.clone()) {
            Entry::Occupied(owner) => {
                if network.id != Some(*owner.get()) {
                    return Err(AppError::conflict(format!(
                        "Network with name '{}' already exists",
                        network.name
                    )));
                }
                *owner.get()
            }
            Entry::Vacant(slot) => {
                let id = self.ks.assign_id(counters::NETWORK, network.id);
                slot.insert(id);
                id
            }
        };
        if let Some(old) = previous_name
            && old != network.name
        {
            self.ks.network_names.remove_if(&old, |_, owner| *owner == id);
        }

        network.id = Some(id);
        self.ks.networks.insert(id, network.clone());
        Ok(network)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let Some((_, network)) = self.ks.networks.remove(&id) else {
            return Ok(false);
        };
        self.ks
            .network_names
            .remove_if(&network.name, |_, owner| *owner == id);
        for mut grants in self.ks.user_networks.iter_mut() {
            grants.value_mut().remove(&id);
        }
        Ok(true)
    }
}

#[async_trait]
impl NetworkRepository for KvNetworkRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Network>> {
        Ok(self
            .ks
            .network_id_by_name(name)
            .and_then(|id| self.ks.networks.get(&id).map(|n| n.value().clone())))
    }

    async fn list(
        &self,
        filter: &NetworkFilter,
        sort: Sort<NetworkSortField>,
        page: Page,
    ) -> AppResult<Vec<Network>> {
        let mut networks: Vec<Network> = Keyspace::scan(&self.ks.networks)
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect();

        networks.sort_by(|a, b| match sort.field {
            NetworkSortField::Id => ordered((a.id, b.id), (a.id, b.id), sort.direction),
            NetworkSortField::Name => ordered((&a.name, &b.name), (a.id, b.id), sort.direction),
        });

        Ok(page.apply(networks))
    }
}
