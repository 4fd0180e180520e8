// src/config/mod.rs
// Configuration: environment variables and ~/.gemchat/config.toml

pub mod env;
pub mod file;

pub use env::ApiKeys;
pub use crate::http::HttpSection;
pub use file::{GemchatConfig, ModelSection, ServerSection};

use std::path::PathBuf;

/// Directory holding config.toml, .env and the REPL history
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gemchat")
}

/// Load .env files (global first, then current directory)
pub fn load_dotenv() {
    let _ = dotenvy::from_path(config_dir().join(".env"));
    let _ = dotenvy::dotenv();
}
