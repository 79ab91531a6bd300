//! User repository and network grants.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::User;
use hive_entity::repository::UserRepository;

use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvUserRepository {
    ks: Arc<Keyspace>,
}

impl KvUserRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<User, i64> for KvUserRepository {
    async fn find(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.ks.users.get(&id).map(|u| u.value().clone()))
    }

    async fn persist(&self, mut user: User) -> AppResult<User> {
        let id = self.ks.assign_id(counters::USER, user.id);
        user.id = Some(id);
        self.ks.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        self.ks.user_networks.remove(&id);
        Ok(self.ks.users.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for KvUserRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        Ok(self
            .ks
            .users
            .iter()
            .find(|u| u.value().login == login)
            .map(|u| u.value().clone()))
    }

    async fn networks_for_user(&self, user_id: i64) -> AppResult<HashSet<i64>> {
        Ok(self
            .ks
            .user_networks
            .get(&user_id)
            .map(|grants| grants.value().clone())
            .unwrap_or_default())
    }

    async fn grant_network(&self, user_id: i64, network_id: i64) -> AppResult<()> {
        self.ks
            .user_networks
            .entry(user_id)
            .or_default()
            .insert(network_id);
        Ok(())
    }
}
