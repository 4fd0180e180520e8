// src/main.rs
// gemchat - minimal Gemini chat server and terminal client

use anyhow::Result;
use clap::Parser;
use gemchat::cli::{self, Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    gemchat::config::load_dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Commands::default_log_filter(cli.command.as_ref())));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or_else(Commands::default_serve) {
        Commands::Serve {
            host,
            port,
            api_key,
            model,
        } => cli::run_server(host, port, api_key, model).await,
        Commands::Chat { url } => cli::run_chat(url).await,
    }
}
