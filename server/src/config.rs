//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Default system prompt when `SYSTEM_PROMPT` is not set.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable assistant. \
    Answer clearly and concisely. If you do not know the answer, say so honestly \
    instead of making one up.";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Messaging-platform channel secret (signs inbound webhook bodies)
    pub channel_secret: String,

    /// Messaging-platform channel access token (authorizes reply calls)
    pub channel_access_token: String,

    /// Completion API key
    pub openai_api_key: String,

    /// Redis connection URL
    pub redis_url: String,

    /// Completion model identifier (default: "gpt-3.5-turbo")
    pub completion_model: String,

    /// System prompt seeded at the head of every conversation
    pub system_prompt: String,

    /// Retained turns per conversation; history holds at most
    /// `1 + 2 * history_turn_limit` entries (default: 10)
    pub history_turn_limit: usize,

    /// Conversation record expiry in seconds (default: 604800 = 7 days)
    pub history_ttl_secs: i64,

    /// Completion API base URL (default: `https://api.openai.com/v1`)
    pub completion_api_base: String,

    /// Messaging-platform API base URL (default: `https://api.line.me`)
    pub messaging_api_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            channel_secret: env::var("CHANNEL_SECRET").context("CHANNEL_SECRET must be set")?,
            channel_access_token: env::var("CHANNEL_ACCESS_TOKEN")
                .context("CHANNEL_ACCESS_TOKEN must be set")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into()),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".into()),
            system_prompt: env::var("SYSTEM_PROMPT")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.into()),
            history_turn_limit: env::var("HISTORY_TURN_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            history_ttl_secs: env::var("HISTORY_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800), // 7 days
            completion_api_base: env::var("COMPLETION_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            messaging_api_base: env::var("MESSAGING_API_BASE")
                .unwrap_or_else(|_| "https://api.line.me".into()),
        })
    }

    /// Create a default configuration for testing.
    ///
    /// Uses the Docker test container for Redis:
    /// `docker run -d --name relay-test-redis -e ALLOW_EMPTY_PASSWORD=yes -p 6379:6379 bitnami/redis:latest`
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            channel_secret: "test-channel-secret".into(),
            channel_access_token: "test-access-token".into(),
            openai_api_key: "test-api-key".into(),
            redis_url: "redis://localhost:6379".into(),
            completion_model: "gpt-3.5-turbo".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            history_turn_limit: 10,
            history_ttl_secs: 604_800,
            completion_api_base: "https://api.openai.com/v1".into(),
            messaging_api_base: "https://api.line.me".into(),
        }
    }
}
