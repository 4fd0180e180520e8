// src/cli/serve.rs
// `gemchat serve`: wire config, provider and session store into the web server

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{ApiKeys, GemchatConfig};
use crate::llm::GeminiClient;
use crate::session::{SWEEP_INTERVAL, SessionStore};
use crate::web::{self, state::AppState};

/// Resolve values: CLI args > env vars (handled by clap) > config file > defaults
pub async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let config = GemchatConfig::load();

    let host = host.unwrap_or(config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let model = model.unwrap_or(config.model.name.clone());
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| ApiKeys::from_env().gemini_or_empty());

    info!(model = %model, "Using Gemini model");

    let http = config.http.build_client()?;
    let provider = Arc::new(GeminiClient::with_http_client(api_key, model, http));
    let sessions = Arc::new(SessionStore::new(config.server.session_ttl()));
    let sweeper = sessions.clone().spawn_sweeper(SWEEP_INTERVAL);

    let state = AppState::new(provider, sessions)
        .with_generation(config.model.generation_config())
        .with_model_display_name(config.model.display_name.clone())
        .with_affordances(config.affordances);

    let result = web::serve(&format!("{}:{}", host, port), state).await;
    sweeper.abort();
    result
}
