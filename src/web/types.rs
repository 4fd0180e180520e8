// src/web/types.rs
// Request/response bodies shared by the server and the terminal client

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::affordance::AffordanceFlags;
use crate::error::{ChatError, Result};

/// Header carrying the session id in both directions
pub const SESSION_HEADER: &str = "x-session-id";

/// Body of `POST /api/chat`.
///
/// `message` is kept loosely typed so a missing or non-string value fails
/// through the same path as a provider error instead of as a 4xx rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
            session_id,
        }
    }

    pub fn message_text(&self) -> Result<String> {
        match &self.message {
            Some(Value::String(text)) => Ok(text.clone()),
            None => Err(ChatError::InvalidInput("message is required".to_string())),
            Some(_) => Err(ChatError::InvalidInput("message must be a string".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /api/config`: what the page needs to render its controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub model: String,
    pub model_display_name: String,
    pub affordances: AffordanceFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}
