//! Network repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::{Page, Sort};
use hive_entity::repository::NetworkRepository;
use hive_entity::{Network, NetworkFilter, NetworkSortField};

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "network";

#[derive(Debug, Clone)]
pub struct PgNetworkRepository {
    pool: PgPool,
}

impl PgNetworkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Network, i64> for PgNetworkRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Network>> {
        sqlx::query_as::<_, Network>("SELECT * FROM networks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, network: Network) -> AppResult<Network> {
        let id = assign_id(&self.pool, ENTITY, network.id).await?;
        sqlx::query_as::<_, Network>(
            r#"
            INSERT INTO networks (id, name, key, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                key = EXCLUDED.key,
                description = EXCLUDED.description
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&network.name)
        .bind(&network.key)
        .bind(&network.description)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM networks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NetworkRepository for PgNetworkRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Network>> {
        sqlx::query_as::<_, Network>("SELECT * FROM networks WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find_by_name"))
    }

    async fn list(
        &self,
        filter: &NetworkFilter,
        sort: Sort<NetworkSortField>,
        page: Page,
    ) -> AppResult<Vec<Network>> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM networks WHERE TRUE");

        if let Some(name) = &filter.name {
            query.push(" AND name = ").push_bind(name);
        } else if let Some(pattern) = &filter.name_pattern {
            query.push(" AND name ~* ").push_bind(pattern.as_str());
        }
        if let Some(ids) = &filter.ids {
            let ids: Vec<i64> = ids.iter().copied().collect();
            query.push(" AND id = ANY(").push_bind(ids).push(")");
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
            .build_query_as::<Network>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(ENTITY, "list"))
    }
}
