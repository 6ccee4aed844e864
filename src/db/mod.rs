pub mod repository;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::config::{Config, Environment};

/// Opens the store named by the config and brings its schema up to date.
///
/// In test mode the configured store is never contacted and a private
/// in-memory database is returned instead.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    if config.environment == Environment::Test {
        info!("test environment, skipping store connection");
        return connect_in_memory().await;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    migrate(&pool).await?;
    info!("store connected");

    Ok(pool)
}

/// Single-connection in-memory database. The connection is never recycled,
/// since dropping it would drop the data.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
