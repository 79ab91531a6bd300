//! Network operations behind the REST surface.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::pagination::MAX_TAKE;
use hive_core::types::{NamePattern, Page, Sort, SortDirection};
use hive_core::AppError;
use hive_entity::repository::{DeviceRepository, NetworkRepository, UserRepository};
use hive_entity::{
    DeviceFilter, Network, NetworkFilter, NetworkSortField, NetworkUpdate, Principal,
    PrincipalRole, Storage, actions,
};

use crate::directory::DeviceDirectory;
use crate::view::DeviceView;

/// Query parameters of a network listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkQuery {
    pub name: Option<String>,
    pub name_pattern: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub take: Option<u32>,
    pub skip: Option<u32>,
}

/// A network together with the devices the caller may see in it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetail {
    #[serde(flatten)]
    pub network: Network,
    pub devices: Vec<DeviceView>,
}

#[derive(Debug, Clone)]
pub struct NetworkService {
    storage: Storage,
    directory: DeviceDirectory,
}

impl NetworkService {
    pub fn new(storage: Storage, directory: DeviceDirectory) -> Self {
        Self { storage, directory }
    }

    fn require(principal: &Principal, roles: &[PrincipalRole], action: &str) -> AppResult<()> {
        if roles.contains(&principal.role()) && principal.has_action(action) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role {} may not perform {action}",
                principal.role()
            )))
        }
    }

    /// Network ids the principal is restricted to, or `None` when
    /// unrestricted.
    async fn allowed_networks(&self, principal: &Principal) -> AppResult<Option<HashSet<i64>>> {
        let mut allowed: Option<HashSet<i64>> = None;

        if let Some(user) = principal.user()
            && !user.is_admin()
        {
            let granted = match user.id {
                Some(id) => self.storage.users.networks_for_user(id).await?,
                None => HashSet::new(),
            };
            allowed = Some(granted);
        }

        if let Some(key) = principal.access_key() {
            for permission in &key.permissions {
                if let Some(ids) = permission.network_ids.as_ref().filter(|ids| !ids.is_empty()) {
                    allowed = Some(match allowed {
                        Some(current) => current.intersection(ids).copied().collect(),
                        None => ids.clone(),
                    });
                }
            }
        }

        Ok(allowed)
    }

    async fn visible(&self, principal: &Principal, network: &Network) -> AppResult<bool> {
        Ok(match (self.allowed_networks(principal).await?, network.id) {
            (None, _) => true,
            (Some(allowed), Some(id)) => allowed.contains(&id),
            (Some(_), None) => false,
        })
    }

    async fn find_visible(&self, principal: &Principal, id: i64) -> AppResult<Network> {
        let not_found = || AppError::not_found(format!("Network {id} not found"));
        let network = self.storage.networks.find(id).await?.ok_or_else(not_found)?;
        if self.visible(principal, &network).await? {
            Ok(network)
        } else {
            Err(not_found())
        }
    }

    /// `GET /network`
    pub async fn list(&self, principal: &Principal, query: NetworkQuery) -> AppResult<Vec<Network>> {
        Self::require(
            principal,
            &[PrincipalRole::Client, PrincipalRole::Admin, PrincipalRole::Key],
            actions::GET_NETWORK,
        )?;

        let filter = NetworkFilter {
            name_pattern: match (&query.name, &query.name_pattern) {
                (None, Some(raw)) => Some(NamePattern::parse(raw)?),
                _ => None,
            },
            name: query.name,
            ids: self.allowed_networks(principal).await?,
        };
        let sort = Sort::new(
            match query.sort_field.as_deref() {
                Some(raw) => raw.parse::<NetworkSortField>()?,
                None => NetworkSortField::default(),
            },
            SortDirection::parse_lenient(query.sort_order.as_deref()),
        );
        let page = Page::new(query.take, query.skip);

        self.storage.networks.list(&filter, sort, page).await
    }

    /// `GET /network/{id}`
    pub async fn get(&self, principal: &Principal, id: i64) -> AppResult<NetworkDetail> {
        Self::require(
            principal,
            &[PrincipalRole::Client, PrincipalRole::Admin, PrincipalRole::Key],
            actions::GET_NETWORK,
        )?;
        let network = self.find_visible(principal, id).await?;

        let filter = DeviceFilter {
            network_id: Some(id),
            ..Default::default()
        };
        let mut views = Vec::new();
        let mut skip = 0;
        loop {
            let batch = self
                .storage
                .devices
                .list(&filter, Sort::default(), Page::new(Some(MAX_TAKE), Some(skip)))
                .await?;
            let fetched = batch.len();
            for device in self.directory.filter_visible(batch, principal).await? {
                views.push(self.directory.view(device).await?);
            }
            if fetched < MAX_TAKE as usize {
                break;
            }
            skip += MAX_TAKE;
        }

        Ok(NetworkDetail {
            network,
            devices: views,
        })
    }

    /// `POST /network`
    pub async fn create(&self, principal: &Principal, draft: NetworkUpdate) -> AppResult<Network> {
        Self::require(
            principal,
            &[PrincipalRole::Admin, PrincipalRole::Key],
            actions::MANAGE_NETWORK,
        )?;

        let name = draft
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::validation("Network name is required"))?;
        if self.storage.networks.find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Network with name '{name}' already exists"
            )));
        }

        let created = self
            .storage
            .networks
            .persist(Network {
                id: None,
                name,
                key: draft.key,
                description: draft.description,
            })
            .await?;

        if let (Some(user), Some(network_id)) = (principal.user(), created.id)
            && !user.is_admin()
            && let Some(user_id) = user.id
        {
            self.storage.users.grant_network(user_id, network_id).await?;
        }

        info!(network_id = ?created.id, name = %created.name, by = %principal.describe(), "Network created");
        Ok(created)
    }

    /// `PUT /network/{id}`
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        update: NetworkUpdate,
    ) -> AppResult<Network> {
        Self::require(
            principal,
            &[PrincipalRole::Admin, PrincipalRole::Key],
            actions::MANAGE_NETWORK,
        )?;

        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Network name cannot be empty"));
        }
        let mut network = self.find_visible(principal, id).await?;
        if let Some(name) = &update.name
            && let Some(other) = self.storage.networks.find_by_name(name).await?
            && other.id != Some(id)
        {
            return Err(AppError::conflict(format!(
                "Network with name '{name}' already exists"
            )));
        }

        network.apply(update);
        let saved = self.storage.networks.persist(network).await?;
        info!(network_id = id, by = %principal.describe(), "Network updated");
        Ok(saved)
    }

    /// `DELETE /network/{id}`
    pub async fn delete(&self, principal: &Principal, id: i64) -> AppResult<()> {
        Self::require(
            principal,
            &[PrincipalRole::Admin, PrincipalRole::Key],
            actions::MANAGE_NETWORK,
        )?;
        self.find_visible(principal, id).await?;
        if !self.storage.networks.delete(id).await? {
            return Err(AppError::not_found(format!("Network {id} not found")));
        }
        info!(network_id = id, by = %principal.describe(), "Network deleted");
        Ok(())
    }
}
