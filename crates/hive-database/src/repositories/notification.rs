//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::Notification;
use hive_entity::repository::NotificationRepository;

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "notification";

#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Notification, i64> for PgNotificationRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, notification: Notification) -> AppResult<Notification> {
        let id = assign_id(&self.pool, ENTITY, notification.id).await?;
        // Notifications are immutable; re-persisting returns the stored row.
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, device_guid, notification, parameters, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET notification = notifications.notification
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&notification.device_guid)
        .bind(&notification.notification)
        .bind(&notification.parameters)
        .bind(notification.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn newer_than(
        &self,
        device_guid: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE device_guid = $1 AND timestamp > $2 ORDER BY timestamp ASC, id ASC",
        )
        .bind(device_guid)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error(ENTITY, "newer_than"))
    }
}
