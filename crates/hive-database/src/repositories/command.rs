//! Command repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::Command;
use hive_entity::repository::CommandRepository;

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "command";

#[derive(Debug, Clone)]
pub struct PgCommandRepository {
    pool: PgPool,
}

impl PgCommandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Command, i64> for PgCommandRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Command>> {
        sqlx::query_as::<_, Command>("SELECT * FROM commands WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, command: Command) -> AppResult<Command> {
        let id = assign_id(&self.pool, ENTITY, command.id).await?;
        // Only status and result are mutable once a command exists.
        sqlx::query_as::<_, Command>(
            r#"
            INSERT INTO commands
                (id, device_guid, command, parameters, lifetime, timestamp, user_id, status, result)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                result = EXCLUDED.result
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&command.device_guid)
        .bind(&command.command)
        .bind(&command.parameters)
        .bind(command.lifetime)
        .bind(command.timestamp)
        .bind(command.user_id)
        .bind(&command.status)
        .bind(&command.result)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM commands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommandRepository for PgCommandRepository {
    async fn newer_than(&self, device_guid: &str, since: DateTime<Utc>) -> AppResult<Vec<Command>> {
        sqlx::query_as::<_, Command>(
            "SELECT * FROM commands WHERE device_guid = $1 AND timestamp > $2 ORDER BY timestamp ASC, id ASC",
        )
        .bind(device_guid)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error(ENTITY, "newer_than"))
    }
}
