use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid schema name: {0}")]
    InvalidSchemaName(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    messages UUID[] NOT NULL DEFAULT '{}'
)";

const CREATE_MESSAGES: &str = "CREATE TABLE IF NOT EXISTS messages (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    author UUID NOT NULL
)";

const CREATE_MESSAGES_AUTHOR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS messages_author_idx ON messages (author)";

/// Builds and prepares Postgres connection pools
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured database. When `schema` is given every
    /// connection gets it as its `search_path`.
    pub async fn connect(config: &DatabaseConfig, schema: Option<&str>) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let display_url = Self::redact_url(url)?;

        let search_path = match schema {
            Some(name) if Self::is_valid_schema_name(name) => {
                Some(format!("SET search_path TO {}", Self::quote_identifier(name)))
            }
            Some(name) => return Err(DatabaseError::InvalidSchemaName(name.to_string())),
            None => None,
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    if let Some(stmt) = search_path {
                        conn.execute(stmt.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await?;

        info!("Created database pool for: {}", display_url);
        Ok(pool)
    }

    /// Create the `users` and `messages` tables if they do not exist yet
    pub async fn init_schema(pool: &PgPool, schema: Option<&str>) -> Result<(), DatabaseError> {
        if let Some(name) = schema {
            if !Self::is_valid_schema_name(name) {
                return Err(DatabaseError::InvalidSchemaName(name.to_string()));
            }
            let stmt = format!("CREATE SCHEMA IF NOT EXISTS {}", Self::quote_identifier(name));
            sqlx::query(&stmt).execute(pool).await?;
        }

        for stmt in [CREATE_USERS, CREATE_MESSAGES, CREATE_MESSAGES_AUTHOR_INDEX] {
            sqlx::query(stmt).execute(pool).await?;
        }

        info!("Database schema ready");
        Ok(())
    }

    /// Drop a schema and everything in it
    pub async fn drop_schema(pool: &PgPool, schema: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_schema_name(schema) {
            return Err(DatabaseError::InvalidSchemaName(schema.to_string()));
        }
        let stmt = format!("DROP SCHEMA IF EXISTS {} CASCADE", Self::quote_identifier(schema));
        sqlx::query(&stmt).execute(pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Parse the URL and blank out the password so it can be logged
    pub fn redact_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Schema names are restricted to [a-zA-Z0-9_], starting with a letter or underscore
    fn is_valid_schema_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
