//! Webhook Event Envelope
//!
//! Serde types for the platform's event payload. Only text message events
//! are relayed; everything else (stickers, follows, joins) is skipped.

use serde::Deserialize;

/// Top-level webhook payload: a batch of events for one bot destination.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event.
///
/// Unknown event and message types must not fail deserialization, so both
/// discriminants are plain strings and extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: Option<MessageContent>,
}

/// Where the event originated (user chat, group, room).
#[derive(Debug, Deserialize)]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Message body attached to a message event.
#[derive(Debug, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: Option<String>,
    pub text: Option<String>,
}

/// A text message event, flattened to the fields the relay needs.
#[derive(Debug)]
pub struct TextMessage<'a> {
    pub reply_token: &'a str,
    pub user_id: Option<&'a str>,
    pub text: &'a str,
}

impl WebhookEvent {
    /// Extract the relayable text message, if this is one.
    pub fn text_message(&self) -> Option<TextMessage<'_>> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        Some(TextMessage {
            reply_token: self.reply_token.as_deref()?,
            user_id: self.source.as_ref().and_then(|s| s.user_id.as_deref()),
            text: message.text.as_deref()?,
        })
    }
}
