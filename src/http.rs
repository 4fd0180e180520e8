// src/http.rs
// Outbound HTTP limits, read from the [http] section of config.toml and
// shared by the Gemini client and the terminal client

use serde::Deserialize;
use std::time::Duration;

use crate::error::{ChatError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpSection {
    /// Whole-request limit; generation can take minutes. 0 disables it.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            request_timeout_secs: 300,
            connect_timeout_secs: 30,
            pool_max_idle_per_host: 10,
        }
    }
}

impl HttpSection {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Build a client with these limits. Create once and clone; reqwest
    /// pools connections internally.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout())
            .pool_max_idle_per_host(self.pool_max_idle_per_host);
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))
    }
}
