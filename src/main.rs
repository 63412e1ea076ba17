use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use message_api::{app, cli::Cli, config, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = config::config().clone();
    cli.apply(&mut config);
    tracing::info!("Starting Message API in {:?} mode", config.environment);

    let store = server::build_store(&config, cli.schema.as_deref()).await?;
    tracing::info!("Using {} store", store.backend());

    let app = app(AppState::new(store.clone()), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Message API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    Ok(())
}
