//! sqlx error translation.

use hive_core::AppError;

/// Translate a sqlx error for `entity`/`operation`.
///
/// Unique violations become conflicts; everything else is a logged storage
/// failure.
pub(crate) fn db_error(
    entity: &'static str,
    operation: &'static str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::conflict(format!("{entity} already exists"))
        }
        _ => AppError::storage_failure(entity, operation, err),
    }
}
