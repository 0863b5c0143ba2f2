//! PostgreSQL pool and schema migrations

use anyhow::{Context, Result};
use hearth_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Connect and bring the schema up to date. Shared by the server and the CLI.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = connect(config).await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;
    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected"
    );
    Ok(pool)
}

/// Apply pending files from the workspace `migrations/` directory.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(dir)
        .await
        .context("Failed to load migrations")?;
    let known = migrator.iter().count();
    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(migrations = known, "Database schema up to date");
    Ok(())
}
