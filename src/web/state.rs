// src/web/state.rs
// Web server state

use std::sync::Arc;

use crate::client::affordance::AffordanceFlags;
use crate::llm::{ChatProvider, GenerationConfig};
use crate::session::SessionStore;
use crate::web::types::PageConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Model provider (Gemini in production)
    pub provider: Arc<dyn ChatProvider>,

    /// Conversations keyed by session id
    pub sessions: Arc<SessionStore>,

    /// Parameters every new conversation starts with
    pub generation: GenerationConfig,

    /// Model selector label
    pub model_display_name: String,

    /// Reply action and model selector flags
    pub affordances: AffordanceFlags,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChatProvider>, sessions: Arc<SessionStore>) -> Self {
        let model_display_name = provider.model_name().to_string();
        Self {
            provider,
            sessions,
            generation: GenerationConfig::default(),
            model_display_name,
            affordances: AffordanceFlags::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_model_display_name(mut self, name: impl Into<String>) -> Self {
        self.model_display_name = name.into();
        self
    }

    pub fn with_affordances(mut self, affordances: AffordanceFlags) -> Self {
        self.affordances = affordances;
        self
    }

    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            model: self.provider.model_name().to_string(),
            model_display_name: self.model_display_name.clone(),
            affordances: self.affordances,
        }
    }
}
