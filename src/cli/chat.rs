// src/cli/chat.rs
// `gemchat chat`: terminal client against a running server

use anyhow::Result;
use tracing::warn;

use crate::client::ChatClient;
use crate::client::affordance::AffordanceFlags;
use crate::client::repl::Repl;
use crate::config::GemchatConfig;
use crate::web::types::PageConfig;

pub async fn run_chat(url: String) -> Result<()> {
    let http = GemchatConfig::load().http.build_client()?;
    let client = ChatClient::with_http_client(&url, http)?;

    // The page still works without its config; controls fall back to off
    let config = match client.fetch_config().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, url = %url, "Could not load page config");
            PageConfig {
                model: String::new(),
                model_display_name: "Gemini".to_string(),
                affordances: AffordanceFlags::default(),
            }
        }
    };

    Repl::new(client, config)?.run().await
}
