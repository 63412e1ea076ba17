#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use message_api::config::AppConfig;
use message_api::database::{MemoryStore, MessageStore, NewUser, User};
use message_api::{app, AppState};

/// A server bound to its own port with its own empty store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn MessageStore> = store.clone();
        let router = app(AppState::new(shared), &AppConfig::default());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind test port {}", port))?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { port, base_url, store, handle })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn seed_user(&self, username: &str) -> Result<User> {
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password: "mypassword".to_string(),
            })
            .await?;
        Ok(user)
    }

    pub async fn user(&self, id: uuid::Uuid) -> Result<User> {
        self.store
            .find_user(id)
            .await?
            .context("seeded user disappeared")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
