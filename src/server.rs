use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, MessageStore, PgMessageStore};

/// Pick the store for this process: Postgres when a database URL is
/// configured, otherwise an in-memory store that is lost on exit.
pub async fn build_store(config: &AppConfig, schema: Option<&str>) -> anyhow::Result<Arc<dyn MessageStore>> {
    if config.database.url.is_none() {
        warn!("DATABASE_URL not set; messages are kept in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database, schema)
        .await
        .context("failed to connect to database")?;

    if config.database.init_schema {
        DatabaseManager::init_schema(&pool, schema)
            .await
            .context("failed to create database schema")?;
    }

    Ok(Arc::new(PgMessageStore::new(pool)))
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
