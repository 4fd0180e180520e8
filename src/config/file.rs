// src/config/file.rs
// File-based configuration from ~/.gemchat/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::affordance::AffordanceFlags;
use crate::http::HttpSection;
use crate::llm::GenerationConfig;
use crate::llm::gemini::DEFAULT_MODEL;
use crate::session::DEFAULT_SESSION_TTL;

/// Top-level config structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GemchatConfig {
    pub server: ServerSection,
    pub model: ModelSection,
    pub http: HttpSection,
    pub affordances: AffordanceFlags,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub session_ttl_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_ttl_secs: DEFAULT_SESSION_TTL.as_secs(),
        }
    }
}

impl ServerSection {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSection {
    pub name: String,
    /// Label shown in the model selector
    pub display_name: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for ModelSection {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            name: DEFAULT_MODEL.to_string(),
            display_name: "Gemini 2.0 Flash Lite".to_string(),
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
        }
    }
}

impl ModelSection {
    /// Generation parameters for new conversations (plain-text output)
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
            ..GenerationConfig::default()
        }
    }
}

impl GemchatConfig {
    /// Load config from ~/.gemchat/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a path, falling back to defaults when the file is
    /// missing or malformed
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        super::config_dir().join("config.toml")
    }
}
