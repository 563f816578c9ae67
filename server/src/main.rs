//! Relay Server - Main Entry Point
//!
//! Webhook-driven chat relay between a messaging platform and an LLM
//! completion API.

use anyhow::Result;
use tracing::info;

use relay_server::{api, config, history::HistoryStore, llm::CompletionClient, messaging};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.completion_model,
        turn_limit = config.history_turn_limit,
        history_ttl_secs = config.history_ttl_secs,
        "Starting Relay Server"
    );

    // Initialize history store (optional - requests run historyless if Redis is down)
    let history = match HistoryStore::connect(&config.redis_url, config.history_ttl_secs).await {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(
                "Redis connection failed: {}. Conversation history disabled.",
                e
            );
            None
        }
    };

    // Initialize outbound clients
    let completion = CompletionClient::new(
        &config.completion_api_base,
        &config.openai_api_key,
        &config.completion_model,
    );
    let messaging = messaging::MessagingClient::new(
        &config.messaging_api_base,
        &config.channel_access_token,
    );

    // Build application state
    let state = api::AppState::new(config.clone(), history, completion, messaging);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
