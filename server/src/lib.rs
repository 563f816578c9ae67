//! Relay Server
//!
//! Webhook-driven chat relay: messaging-platform events in, LLM completion
//! replies out, with a short rolling conversation history per user in Redis.

pub mod api;
pub mod config;
pub mod history;
pub mod llm;
pub mod messaging;
