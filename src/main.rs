use anyhow::Context;
use tracing_subscriber::EnvFilter;

use campus_api::config::AppConfig;
use campus_api::database::DatabaseManager;
use campus_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campus_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting campus API in {:?} mode", config.environment);

    // Opened once; a failed connection leaves the server up with every storage call failing
    let store = DatabaseManager::open_store(&config.database).await;
    let state = AppState::new(store);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("campus server listening on http://{}", bind_addr);

    campus_api::serve(listener, state, &config).await?;
    Ok(())
}
