//! Per-entity storage contracts and the [`Storage`] bundle.
//!
//! Every backend implements each trait independently; services only ever
//! see `Arc<dyn …Repository>` handles, so the same logic runs against any
//! backend.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::{Page, Sort};

use crate::access_key::AccessKey;
use crate::command::Command;
use crate::device::{Device, DeviceFilter, DeviceSortField};
use crate::device_class::DeviceClass;
use crate::network::{Network, NetworkFilter, NetworkSortField};
use crate::notification::Notification;
use crate::user::User;

/// Device storage.
#[async_trait]
pub trait DeviceRepository: Repository<Device, i64> {
    /// Natural-key lookup.
    async fn find_by_guid(&self, guid: &str) -> AppResult<Option<Device>>;

    /// Lookup by guid that only succeeds on an exact key match.
    async fn find_by_guid_and_key(&self, guid: &str, key: &str) -> AppResult<Option<Device>>;

    async fn list(
        &self,
        filter: &DeviceFilter,
        sort: Sort<DeviceSortField>,
        page: Page,
    ) -> AppResult<Vec<Device>>;

    async fn delete_by_guid(&self, guid: &str) -> AppResult<bool>;
}

/// Network storage.
#[async_trait]
pub trait NetworkRepository: Repository<Network, i64> {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Network>>;

    async fn list(
        &self,
        filter: &NetworkFilter,
        sort: Sort<NetworkSortField>,
        page: Page,
    ) -> AppResult<Vec<Network>>;
}

/// Device class storage.
#[async_trait]
pub trait DeviceClassRepository: Repository<DeviceClass, i64> {
    async fn find_by_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> AppResult<Option<DeviceClass>>;
}

/// Command storage.
#[async_trait]
pub trait CommandRepository: Repository<Command, i64> {
    /// Commands for `device_guid` created strictly after `since`, ascending
    /// by timestamp then id.
    async fn newer_than(&self, device_guid: &str, since: DateTime<Utc>) -> AppResult<Vec<Command>>;
}

/// Notification storage.
#[async_trait]
pub trait NotificationRepository: Repository<Notification, i64> {
    /// Notifications for `device_guid` created strictly after `since`,
    /// ascending by timestamp then id.
    async fn newer_than(
        &self,
        device_guid: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<Notification>>;
}

/// User storage and network grants.
#[async_trait]
pub trait UserRepository: Repository<User, i64> {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>>;

    /// Ids of every network granted to the user.
    async fn networks_for_user(&self, user_id: i64) -> AppResult<HashSet<i64>>;

    /// Grant a network to a user. Granting twice is a no-op.
    async fn grant_network(&self, user_id: i64, network_id: i64) -> AppResult<()>;
}

/// Access key storage.
#[async_trait]
pub trait AccessKeyRepository: Repository<AccessKey, i64> {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<AccessKey>>;
}

/// Handles to every entity store of one backend.
#[derive(Clone)]
pub struct Storage {
    pub devices: Arc<dyn DeviceRepository>,
    pub networks: Arc<dyn NetworkRepository>,
    pub device_classes: Arc<dyn DeviceClassRepository>,
    pub commands: Arc<dyn CommandRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub access_keys: Arc<dyn AccessKeyRepository>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
