//! PostgreSQL pool for the relational storage backend.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use hive_core::config::DatabaseConfig;
use hive_core::error::AppError;
use hive_core::result::AppResult;

/// Connection pool shared by every `Pg*Repository`.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `[database]` and verify it answers.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = pool_options(config)?;
        info!(
            url = %redacted_url(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Opening storage pool"
        );

        let pool = options
            .connect(&config.url)
            .await
            .map_err(|e| AppError::storage_failure("database", "connect", e))?;
        let pool = Self { pool };
        pool.ping().await?;

        info!("Storage pool ready");
        Ok(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn into_pool(self) -> PgPool {
        self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::storage_failure("database", "ping", e))
    }
}

/// Pool options for `config`, rejecting settings sqlx would only trip
/// over at runtime.
fn pool_options(config: &DatabaseConfig) -> AppResult<PgPoolOptions> {
    if config.url.trim().is_empty() {
        return Err(AppError::configuration("database.url is empty"));
    }
    if config.max_connections == 0 {
        return Err(AppError::configuration(
            "database.max_connections must be at least 1",
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(AppError::configuration(format!(
            "database.min_connections ({}) exceeds max_connections ({})",
            config.min_connections, config.max_connections
        )));
    }
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds)))
}

/// The URL with any password in its userinfo replaced by `****`.
fn redacted_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
