use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "message-api")]
#[command(about = "REST API for messages and the users who author them")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (overrides API_HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep data in memory even when DATABASE_URL is set")]
    pub memory: bool,

    #[arg(long, help = "Create the users and messages tables on startup")]
    pub init_schema: bool,

    #[arg(long, env = "DATABASE_SCHEMA", help = "Postgres schema to use as search_path")]
    pub schema: Option<String>,
}

impl Cli {
    /// Fold command-line overrides into the environment-derived config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.api.host = host.clone();
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if self.memory {
            config.database.url = None;
        }
        if self.init_schema {
            config.database.init_schema = true;
        }
    }
}
