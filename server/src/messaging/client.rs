//! Reply Client
//!
//! Outbound client for the platform's reply endpoint: posts the reply text
//! back to the originating conversation, keyed by the event's reply token.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("reply request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reply endpoint returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: Vec<ReplyMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

/// Client for the messaging platform's bot API.
#[derive(Clone)]
pub struct MessagingClient {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl MessagingClient {
    #[must_use]
    pub fn new(api_base: &str, access_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Send a text reply to the conversation identified by `reply_token`.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![ReplyMessage {
                message_type: "text",
                text,
            }],
        };

        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::Api { status, body });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_body_matches_wire_format() {
        let request = ReplyRequest {
            reply_token: "token-1",
            messages: vec![ReplyMessage {
                message_type: "text",
                text: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["replyToken"], "token-1");
        assert_eq!(json["messages"][0]["type"], "text");
        assert_eq!(json["messages"][0]["text"], "hello");
    }
}
