// src/cli/mod.rs
// CLI definition and command handlers

use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

pub use chat::run_chat;
pub use serve::run_server;

#[derive(Parser)]
#[command(name = "gemchat")]
#[command(about = "Minimal Gemini chat server and client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the chat server and web page (default)
    Serve {
        /// Address to bind (overrides config.toml)
        #[arg(long, env = "GEMCHAT_HOST")]
        host: Option<String>,

        /// Port to listen on (overrides config.toml)
        #[arg(short, long, env = "GEMCHAT_PORT")]
        port: Option<u16>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model name (overrides config.toml)
        #[arg(long)]
        model: Option<String>,
    },

    /// Chat with a running server from the terminal
    Chat {
        /// Server base URL
        #[arg(long, env = "GEMCHAT_URL", default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

impl Commands {
    /// `serve` with its flags resolved from the environment alone, used
    /// when no subcommand is given
    pub fn default_serve() -> Self {
        Cli::try_parse_from(["gemchat", "serve"])
            .ok()
            .and_then(|cli| cli.command)
            .unwrap_or(Commands::Serve {
                host: None,
                port: None,
                api_key: None,
                model: None,
            })
    }

    /// Server logs at info, the interactive client stays quiet
    pub fn default_log_filter(command: Option<&Commands>) -> &'static str {
        match command {
            Some(Commands::Chat { .. }) => "warn",
            Some(Commands::Serve { .. }) | None => "info",
        }
    }
}
