//! Device class repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::DeviceClass;
use hive_entity::repository::DeviceClassRepository;

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "device_class";

#[derive(Debug, Clone)]
pub struct PgDeviceClassRepository {
    pool: PgPool,
}

impl PgDeviceClassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<DeviceClass, i64> for PgDeviceClassRepository {
    async fn find(&self, id: i64) -> AppResult<Option<DeviceClass>> {
        sqlx::query_as::<_, DeviceClass>("SELECT * FROM device_classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, class: DeviceClass) -> AppResult<DeviceClass> {
        let id = assign_id(&self.pool, ENTITY, class.id).await?;
        sqlx::query_as::<_, DeviceClass>(
            r#"
            INSERT INTO device_classes
                (id, name, version, is_permanent, offline_timeout, data, equipment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                version = EXCLUDED.version,
                is_permanent = EXCLUDED.is_permanent,
                offline_timeout = EXCLUDED.offline_timeout,
                data = EXCLUDED.data,
                equipment = EXCLUDED.equipment
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&class.name)
        .bind(&class.version)
        .bind(class.is_permanent)
        .bind(class.offline_timeout)
        .bind(&class.data)
        .bind(Json(&class.equipment))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM device_classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DeviceClassRepository for PgDeviceClassRepository {
    async fn find_by_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> AppResult<Option<DeviceClass>> {
        sqlx::query_as::<_, DeviceClass>(
            "SELECT * FROM device_classes WHERE name = $1 AND version = $2",
        )
        .bind(name)
        .bind(version)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error(ENTITY, "find_by_name_and_version"))
    }
}
