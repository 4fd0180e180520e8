// src/error.rs
// Error type shared by the chat endpoint, provider client and terminal client

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned to callers when an error carries no text of its own
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to process chat request";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Error reported by the model provider, passed through verbatim
    #[error("{0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    /// Text placed under `error` in the JSON body
    pub fn to_user_string(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_user_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
