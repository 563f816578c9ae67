//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config, history::HistoryStore, llm::CompletionClient, messaging,
    messaging::MessagingClient,
};

/// Shared application state.
///
/// All external clients are constructed in `main` and passed in here, so
/// tests can substitute endpoints through the config instead of patching
/// globals.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Conversation history store (None when Redis is unavailable)
    pub history: Option<HistoryStore>,
    /// Completion API client
    pub completion: CompletionClient,
    /// Messaging-platform reply client
    pub messaging: MessagingClient,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        config: Config,
        history: Option<HistoryStore>,
        completion: CompletionClient,
        messaging: MessagingClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            history,
            completion,
            messaging,
        }
    }

    /// Check if conversation history is available.
    #[must_use]
    pub const fn has_history(&self) -> bool {
        self.history.is_some()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status check
        .route("/", get(status))
        // Platform webhook
        .route("/webhook", post(messaging::webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Status response.
#[derive(Serialize)]
struct StatusResponse {
    /// Service status
    status: &'static str,
}

/// Status endpoint.
async fn status(State(_state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}
