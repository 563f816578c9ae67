//! History Store
//!
//! Redis-backed persistence for conversation histories. Each user has a
//! string key `conversation:{user_id}` holding the JSON-serialized entry
//! list, expired after the configured TTL.

use anyhow::{Context, Result};
use fred::prelude::*;
use tracing::info;

use super::ChatEntry;

/// Redis key for a user's conversation history.
fn conversation_key(user_id: &str) -> String {
    format!("conversation:{user_id}")
}

/// Redis-backed conversation history store.
#[derive(Clone)]
pub struct HistoryStore {
    redis: Client,
    ttl_secs: i64,
}

impl HistoryStore {
    /// Connect to Redis and return a ready store.
    pub async fn connect(redis_url: &str, ttl_secs: i64) -> Result<Self> {
        let config = Config::from_url(redis_url)?;
        let redis = Client::new(config, None, None, None);
        redis.connect();
        redis.wait_for_connect().await?;

        info!("Connected to Redis");
        Ok(Self { redis, ttl_secs })
    }

    /// Wrap an existing client (used by integration tests).
    #[cfg(test)]
    pub fn with_client(redis: Client, ttl_secs: i64) -> Self {
        Self { redis, ttl_secs }
    }

    /// Load a user's history. `None` when no record exists (or it expired).
    pub async fn load(&self, user_id: &str) -> Result<Option<Vec<ChatEntry>>> {
        let raw: Option<String> = self.redis.get(conversation_key(user_id)).await?;
        match raw {
            Some(json) => {
                let entries = serde_json::from_str(&json)
                    .context("stored conversation history is not valid JSON")?;
                Ok(Some(entries))
            }
            None => Ok(None),
        }
    }

    /// Save a user's history, refreshing the TTL.
    pub async fn save(&self, user_id: &str, entries: &[ChatEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        let _: () = self
            .redis
            .set(
                conversation_key(user_id),
                json,
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await?;
        Ok(())
    }

    /// Time-to-live applied to saved histories, in seconds.
    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}
