//! Device repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::{Page, Sort};
use hive_entity::repository::DeviceRepository;
use hive_entity::{Device, DeviceFilter, DeviceSortField};

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "device";

#[derive(Debug, Clone)]
pub struct PgDeviceRepository {
    pool: PgPool,
}

impl PgDeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Device, i64> for PgDeviceRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, device: Device) -> AppResult<Device> {
        let id = assign_id(&self.pool, ENTITY, device.id).await?;
        sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (id, guid, key, name, status, data, network_id, device_class_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                guid = EXCLUDED.guid,
                key = EXCLUDED.key,
                name = EXCLUDED.name,
                status = EXCLUDED.status,
                data = EXCLUDED.data,
                network_id = EXCLUDED.network_id,
                device_class_id = EXCLUDED.device_class_id
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&device.guid)
        .bind(&device.key)
        .bind(&device.name)
        .bind(&device.status)
        .bind(&device.data)
        .bind(device.network_id)
        .bind(device.device_class_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DeviceRepository for PgDeviceRepository {
    async fn find_by_guid(&self, guid: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE guid = $1")
            .bind(guid)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find_by_guid"))
    }

    async fn find_by_guid_and_key(&self, guid: &str, key: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE guid = $1 AND key = $2")
            .bind(guid)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find_by_guid_and_key"))
    }

    async fn list(
        &self,
        filter: &DeviceFilter,
        sort: Sort<DeviceSortField>,
        page: Page,
    ) -> AppResult<Vec<Device>> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM devices WHERE TRUE");

        if let Some(name) = &filter.name {
            query.push(" AND name = ").push_bind(name);
        } else if let Some(pattern) = &filter.name_pattern {
            query.push(" AND name ~* ").push_bind(pattern.as_str());
        }
        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(network_id) = filter.network_id {
            query.push(" AND network_id = ").push_bind(network_id);
        }
        if let Some(network_name) = &filter.network_name {
            query
                .push(" AND network_id IN (SELECT id FROM networks WHERE name = ")
                .push_bind(network_name)
                .push(")");
        }
        if let Some(class_id) = filter.device_class_id {
            query.push(" AND device_class_id = ").push_bind(class_id);
        }
        if let Some(class_name) = &filter.device_class_name {
            query
                .push(" AND device_class_id IN (SELECT id FROM device_classes WHERE name = ")
                .push_bind(class_name)
                .push(")");
        }

        query
            .push(format!(
                " ORDER BY {} {}, id ASC",
                sort.field.column(),
                sort.direction.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        query
            .build_query_as::<Device>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(ENTITY, "list"))
    }

    async fn delete_by_guid(&self, guid: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM devices WHERE guid = $1")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete_by_guid"))?;
        Ok(result.rows_affected() > 0)
    }
}
