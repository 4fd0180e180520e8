// src/config/env.rs
// Environment-based configuration

use tracing::{debug, warn};

/// Provider credentials loaded from the environment
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        let gemini = read_key("GEMINI_API_KEY").or_else(|| read_key("GOOGLE_API_KEY"));
        let keys = Self { gemini };
        keys.log_status();
        keys
    }

    /// Key handed to the provider client.
    ///
    /// A missing key is not fatal at startup; the provider rejects the
    /// empty credential and that failure reaches callers as a normal error.
    pub fn gemini_or_empty(&self) -> String {
        self.gemini.clone().unwrap_or_default()
    }

    fn log_status(&self) {
        if self.gemini.is_some() {
            debug!("Gemini API key loaded");
        } else {
            warn!("GEMINI_API_KEY not set - chat requests will fail until it is configured");
        }
    }
}

/// Read a single key from the environment, filtering empty values
fn read_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|k| !k.trim().is_empty())
}
