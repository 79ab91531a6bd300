//! Id counters backed by the `counters` table.

use sqlx::PgPool;

use hive_core::result::AppResult;

use crate::error::db_error;

/// Take the id for a persist: the entity's own id (bumping the counter past
/// it), or the next counter value.
pub(crate) async fn assign_id(pool: &PgPool, name: &'static str, id: Option<i64>) -> AppResult<i64> {
    match id {
        Some(id) => {
            sqlx::query("UPDATE counters SET value = GREATEST(value, $2) WHERE name = $1")
                .bind(name)
                .bind(id)
                .execute(pool)
                .await
                .map_err(db_error(name, "observe_id"))?;
            Ok(id)
        }
        None => sqlx::query_scalar::<_, i64>(
            "UPDATE counters SET value = value + 1 WHERE name = $1 RETURNING value",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(db_error(name, "next_id")),
    }
}
