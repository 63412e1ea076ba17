use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When unset the server keeps data in memory.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait when acquiring a pooled connection
    pub connection_timeout: u64,
    /// Create the `users` and `messages` tables on startup if missing
    pub init_schema: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            let v = v.trim();
            self.database.url = if v.is_empty() { None } else { Some(v.to_string()) };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_INIT_SCHEMA") {
            self.database.init_schema = v.parse().unwrap_or(self.database.init_schema);
        }

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = parse_origins(&v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
                init_schema: true,
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
                init_schema: true,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
                init_schema: false,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.url.is_none());
        assert!(config.database.init_schema);
        assert_eq!(config.security.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.database.init_schema);
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn parses_origin_lists() {
        assert_eq!(
            parse_origins(" https://a.example.com, ,https://b.example.com "),
            vec!["https://a.example.com".to_string(), "https://b.example.com".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }
}
