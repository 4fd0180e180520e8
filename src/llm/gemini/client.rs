// src/llm/gemini/client.rs
// Google Gemini generateContent client (non-streaming, single attempt)
// Conversation history is kept locally and replayed on every call

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::http::HttpSection;
use crate::llm::gemini::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
};
use crate::llm::{ChatProvider, Conversation, Role};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-2.0-pro-exp-02-05";

/// Header carrying the API key; keeps the key out of URLs and error text
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with a custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        let http = HttpSection::default().build_client().unwrap_or_default();
        Self::with_http_client(api_key, model, http)
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            http: client,
        }
    }

    /// Point the client at a different API base (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request contents: full history followed by the new message
    fn build_contents(conversation: &Conversation, message: &str) -> Vec<Content> {
        conversation
            .history()
            .iter()
            .map(Content::from)
            .chain(std::iter::once(Content::text(Role::User.to_string(), message)))
            .collect()
    }

    /// Turn a non-2xx body into the provider's own message when it sent one
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.message.is_empty() => {
                format!("Gemini API error {}: {}", status, envelope.error.message)
            }
            _ if body.trim().is_empty() => format!("Gemini API error {}", status),
            _ => format!("Gemini API error {}: {}", status, body.trim()),
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, conversation, message), fields(model = %self.model, history = conversation.len()))]
    async fn send_message(&self, conversation: &mut Conversation, message: &str) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        let request = GenerateContentRequest {
            contents: Self::build_contents(conversation, message),
            generation_config: conversation.config(),
        };

        info!(
            request_id = %request_id,
            content_count = request.contents.len(),
            "Starting Gemini chat request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(request_id = %request_id, status = %status, duration_ms, "Gemini request failed");
            return Err(ChatError::Provider(Self::error_message(status, &body)));
        }

        let data: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = data.text().map_err(ChatError::Provider)?;

        if let Some(ref usage) = data.usage_metadata {
            debug!(
                request_id = %request_id,
                prompt_tokens = usage.prompt_token_count.unwrap_or(0),
                completion_tokens = usage.candidates_token_count.unwrap_or(0),
                "Gemini usage"
            );
        }

        info!(
            request_id = %request_id,
            duration_ms,
            reply_len = text.len(),
            "Gemini chat request completed"
        );

        conversation.record_exchange(message, text.clone());
        Ok(text)
    }
}
