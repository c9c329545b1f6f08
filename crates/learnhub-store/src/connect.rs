use std::time::Duration;

use learnhub_config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::StoreError;

/// Open a connection pool for `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, StoreError> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(opt).await?;
    info!(backend = ?db.get_database_backend(), "connected to database");
    Ok(db)
}

/// Settings for a private in-memory SQLite database. A single pooled
/// connection keeps every query on the same database.
pub fn in_memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    }
}
