//! User entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::UserRole;

/// A user account. Users own access keys and are granted networks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<i64>,
    pub login: String,
    pub role: UserRole,
    /// Account status; `0` is active.
    pub status: i32,
}

impl User {
    pub const STATUS_ACTIVE: i32 = 0;

    /// Create an unsaved active user.
    pub fn new(login: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: None,
            login: login.into(),
            role,
            status: Self::STATUS_ACTIVE,
        }
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_active(&self) -> bool {
        self.status == Self::STATUS_ACTIVE
    }
}
