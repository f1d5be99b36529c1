//! # LinkDesk API Server
//!
//! Back-office HTTP API: cookie-based sessions plus uniform CRUD over the
//! four record collections (clients, prospects, tasks, users).
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p linkdesk-api
//! ```

use std::sync::Arc;

use linkdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use linkdesk_shared::{db, store::postgres::PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "LinkDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Fails fast when DATABASE_URL or JWT_SECRET is missing/too short.
    let config = Config::from_env()?;

    let pool = db::create_pool(db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let store = Arc::new(PgStore::new(pool));
    store.init_schema().await?;

    let bind_address = config.bind_address();
    let state = AppState::new(store.clone(), store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    } else {
        tracing::info!("Shutdown signal received");
    }
}
