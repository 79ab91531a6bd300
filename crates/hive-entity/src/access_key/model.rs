//! Access key entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::permission::AccessKeyPermission;

/// A bearer secret owned by a user, scoped by a list of permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    pub id: Option<i64>,
    /// The bearer secret.
    #[serde(skip_serializing)]
    pub key: String,
    pub label: String,
    pub user_id: i64,
    pub expiration: Option<DateTime<Utc>>,
    #[sqlx(json)]
    pub permissions: Vec<AccessKeyPermission>,
}

impl AccessKey {
    /// Check whether the key has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether any permission grants `action`.
    pub fn allows_action(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p.allows_action(action))
    }
}
