// src/client/api.rs
// HTTP client for the chat endpoint, used by the terminal client

use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::error::{ChatError, Result};
use crate::http::HttpSection;
use crate::web::types::{ChatRequest, ChatResponse, ErrorResponse, PageConfig, SESSION_HEADER};

/// Talks to a running `gemchat serve`, remembering the session it was issued
pub struct ChatClient {
    http: reqwest::Client,
    base: Url,
    session_id: Option<String>,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http_client(base_url, HttpSection::default().build_client()?)
    }

    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ChatError::Config(format!("invalid server URL {}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            session_id: None,
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ChatError::Config(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Send one message and return the reply text.
    ///
    /// Any non-2xx status is an error; the server's `error` text is kept
    /// for logging only.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        let request = ChatRequest::new(message, self.session_id.clone());

        let response = self
            .http
            .post(self.url("api/chat")?)
            .json(&request)
            .send()
            .await?;

        if let Some(id) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            self.session_id = Some(id.to_string());
        }

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ChatError::Provider(format!("Failed to get response: {}", detail)));
        }

        let body: ChatResponse = response.json().await?;
        if let Some(id) = body.session_id {
            self.session_id = Some(id);
        }
        debug!(session_id = ?self.session_id, reply_len = body.response.len(), "Chat reply received");
        Ok(body.response)
    }

    /// End the current session on the server, if any
    pub async fn end_session(&mut self) -> Result<()> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };

        let response = self
            .http
            .delete(self.url(&format!("api/session/{}", id))?)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ChatError::SessionNotFound(id)),
            s => Err(ChatError::Provider(format!("Failed to end session: {}", s))),
        }
    }

    pub async fn fetch_config(&self) -> Result<PageConfig> {
        let response = self
            .http
            .get(self.url("api/config")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
