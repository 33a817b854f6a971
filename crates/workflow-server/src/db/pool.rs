//! Postgres pool construction and liveness probe.

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub type DbPool = PgPool;

/// Open the pool and make sure at least one connection succeeds.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max)
        .min_connections(config.pool_min)
        .acquire_timeout(Duration::from_secs(config.pool_acquire_timeout_secs))
        .connect_with(config.connect_options())
        .await?;

    tracing::info!(
        target = %config.display_target(),
        schema = %config.schema,
        max = config.pool_max,
        "Connected to Postgres"
    );

    Ok(pool)
}

/// `true` when a trivial round trip completes.
pub async fn health_check(pool: &DbPool) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "Database probe failed");
            false
        }
    }
}
