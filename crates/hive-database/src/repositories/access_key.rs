//! Access key repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::AccessKey;
use hive_entity::repository::AccessKeyRepository;

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "access_key";

#[derive(Debug, Clone)]
pub struct PgAccessKeyRepository {
    pool: PgPool,
}

impl PgAccessKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<AccessKey, i64> for PgAccessKeyRepository {
    async fn find(&self, id: i64) -> AppResult<Option<AccessKey>> {
        sqlx::query_as::<_, AccessKey>("SELECT * FROM access_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, key: AccessKey) -> AppResult<AccessKey> {
        let id = assign_id(&self.pool, ENTITY, key.id).await?;
        sqlx::query_as::<_, AccessKey>(
            r#"
            INSERT INTO access_keys (id, key, label, user_id, expiration, permissions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                key = EXCLUDED.key,
                label = EXCLUDED.label,
                user_id = EXCLUDED.user_id,
                expiration = EXCLUDED.expiration,
                permissions = EXCLUDED.permissions
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&key.key)
        .bind(&key.label)
        .bind(key.user_id)
        .bind(key.expiration)
        .bind(Json(&key.permissions))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccessKeyRepository for PgAccessKeyRepository {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<AccessKey>> {
        sqlx::query_as::<_, AccessKey>("SELECT * FROM access_keys WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find_by_key"))
    }
}
