//! Messaging Platform Integration
//!
//! Inbound webhook handling (signature verification, event parsing, the
//! relay pipeline) and the outbound reply client.

mod client;
pub mod events;
mod handlers;
pub mod signature;

pub use client::{MessagingClient, MessagingError};
pub use handlers::{webhook, WebhookError};
