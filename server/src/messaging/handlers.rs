//! Webhook Handler
//!
//! Receives the platform's `POST /webhook`, verifies the body signature,
//! and runs the relay pipeline for each text message event:
//! load history → append user turn → trim → complete → append assistant
//! turn → trim → save → reply.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use tracing::{error, warn};

use crate::api::AppState;
use crate::history::{trim_window, ChatEntry};
use crate::llm::APOLOGY_REPLY;

use super::client::MessagingError;
use super::events::{TextMessage, WebhookPayload};
use super::signature;

/// Header carrying the base64 HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Missing signature header")]
    MissingSignature,

    #[error("Signature mismatch")]
    InvalidSignature,

    #[error("Malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Reply delivery failed: {0}")]
    ReplyFailed(#[from] MessagingError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            Self::MissingSignature => (
                StatusCode::BAD_REQUEST,
                "missing_signature",
                "Missing signature header",
            ),
            Self::InvalidSignature => (
                StatusCode::BAD_REQUEST,
                "signature_mismatch",
                "Signature verification failed",
            ),
            Self::MalformedPayload(err) => {
                warn!("Malformed webhook payload: {}", err);
                (
                    StatusCode::BAD_REQUEST,
                    "malformed_payload",
                    "Event payload could not be parsed",
                )
            }
            Self::ReplyFailed(err) => {
                error!("Reply delivery failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "reply_failed",
                    "Reply could not be delivered",
                )
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

/// `POST /webhook` — verify, parse, and relay each text message event.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    if !signature::verify_signature(&state.config.channel_secret, &body, signature) {
        warn!("Webhook signature mismatch");
        return Err(WebhookError::InvalidSignature);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)?;

    for event in &payload.events {
        let Some(message) = event.text_message() else {
            continue;
        };
        let reply_text = relay_text(&state, &message).await;
        state.messaging.reply(message.reply_token, &reply_text).await?;
    }

    Ok("OK")
}

/// Run one text message through the history + completion pipeline and
/// return the reply text. Never fails: completion errors degrade to the
/// fixed apology reply, history errors degrade to a historyless exchange.
async fn relay_text(state: &AppState, message: &TextMessage<'_>) -> String {
    let turn_limit = state.config.history_turn_limit;

    // Events without a user id (some group sources) have no history key.
    let loaded = match (&state.history, message.user_id) {
        (Some(store), Some(user_id)) => match store.load(user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("History load failed, answering without history: {}", e);
                None
            }
        },
        _ => None,
    };
    let mut history = seed_history(loaded, &state.config.system_prompt);

    history.push(ChatEntry::user(message.text));
    trim_window(&mut history, turn_limit);

    let reply = match state.completion.complete(&history).await {
        Ok(text) => text,
        Err(e) => {
            error!("Completion call failed: {}", e);
            APOLOGY_REPLY.to_string()
        }
    };

    history.push(ChatEntry::assistant(reply.clone()));
    trim_window(&mut history, turn_limit);

    // Write failures are tolerated; the next request sees stale history.
    if let (Some(store), Some(user_id)) = (&state.history, message.user_id) {
        if let Err(e) = store.save(user_id, &history).await {
            warn!("History save failed, reply sent anyway: {}", e);
        }
    }

    reply
}

/// Start from the stored history, or seed a fresh one holding only the
/// system prompt when nothing was loaded (absent key, cache down, no user
/// id).
fn seed_history(loaded: Option<Vec<ChatEntry>>, system_prompt: &str) -> Vec<ChatEntry> {
    match loaded {
        Some(entries) if !entries.is_empty() => entries,
        _ => vec![ChatEntry::system(system_prompt)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ChatRole;

    #[test]
    fn seed_uses_stored_history_when_present() {
        let stored = vec![
            ChatEntry::system("prompt"),
            ChatEntry::user("q"),
            ChatEntry::assistant("a"),
        ];
        let history = seed_history(Some(stored.clone()), "prompt");
        assert_eq!(history, stored);
    }

    #[test]
    fn seed_falls_back_to_system_prompt() {
        for loaded in [None, Some(Vec::new())] {
            let history = seed_history(loaded, "prompt");
            assert_eq!(history, vec![ChatEntry::system("prompt")]);
        }
    }

    #[test]
    fn degraded_exchange_is_system_plus_user() {
        // Cache unavailable: the completion request must still carry
        // exactly the system prompt and the current user message.
        let mut history = seed_history(None, "prompt");
        history.push(ChatEntry::user("current question"));
        trim_window(&mut history, 10);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::System);
        assert_eq!(history[1], ChatEntry::user("current question"));
    }

    #[test]
    fn error_responses_use_expected_status() {
        let response = WebhookError::MissingSignature.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = WebhookError::InvalidSignature.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
