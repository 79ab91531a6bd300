//! User repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::User;
use hive_entity::repository::UserRepository;

use crate::counters::assign_id;
use crate::error::db_error;

const ENTITY: &str = "user";

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User, i64> for PgUserRepository {
    async fn find(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find"))
    }

    async fn persist(&self, user: User) -> AppResult<User> {
        let id = assign_id(&self.pool, ENTITY, user.id).await?;
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, login, role, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                login = EXCLUDED.login,
                role = EXCLUDED.role,
                status = EXCLUDED.status
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.login)
        .bind(user.role)
        .bind(user.status)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error(ENTITY, "persist"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error(ENTITY, "delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(ENTITY, "find_by_login"))
    }

    async fn networks_for_user(&self, user_id: i64) -> AppResult<HashSet<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT network_id FROM user_networks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error(ENTITY, "networks_for_user"))?;
        Ok(ids.into_iter().collect())
    }

    async fn grant_network(&self, user_id: i64, network_id: i64) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_networks (user_id, network_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(network_id)
        .execute(&self.pool)
        .await
        .map_err(db_error(ENTITY, "grant_network"))?;
        Ok(())
    }
}
