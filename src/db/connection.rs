use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

fn is_sqlite(url: &str) -> bool {
    url.trim().to_ascii_lowercase().starts_with("sqlite:")
}

/// Opens the pool and syncs the schema from the entity registry.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    if is_sqlite(&cfg.url) {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
    }

    info!("syncing database schema from entities");
    db.get_schema_registry("activation_auth::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}

pub async fn close(db: DatabaseConnection) -> anyhow::Result<()> {
    db.close().await?;
    info!("database connection closed");
    Ok(())
}
