//! philosophy-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use philosophy_gateway::app_state::AppState;
use philosophy_gateway::config::GatewayConfig;
use philosophy_gateway::persistence::{PostgresPersistence, Store};
use philosophy_gateway::service::ConvictionService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().context("invalid listen address")?;
    tracing::info!(addr = %config.listen_addr, "starting philosophy-gateway");

    // Select storage
    let store = if config.persistence_enabled {
        let pg = PostgresPersistence::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        pg.migrate().await.context("running migrations")?;
        Store::Postgres(pg)
    } else {
        tracing::warn!("persistence disabled, articles and the conviction meter live in memory");
        Store::in_memory()
    };

    // Seed the meter from storage and wire everything together
    let counter = ConvictionService::load_counter(&store).await;
    tracing::info!(store = store.kind(), count = counter.read(), "conviction meter loaded");

    let app_state = AppState::build(&config, store, counter).context("building application state")?;
    tracing::info!(
        ai = %app_state.ai.base_url(),
        sns = %app_state.sns.base_url(),
        "upstream services configured"
    );

    let app = philosophy_gateway::app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
