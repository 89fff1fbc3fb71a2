//! `distill serve` command - Start the HTTP API server

use anyhow::Result;
use distill_core::{server, Config, GeminiClient};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(config: Config) -> Result<()> {
    info!("Starting Distill server...");

    let gemini_client = GeminiClient::from_config(&config.gemini)?;

    if !gemini_client.has_api_key() {
        warn!("No Gemini API key configured; /api/summarize will fail until GEMINI_API_KEY is set");
    }

    println!("🚀 Distill server starting on {}", config.server_url());
    println!("   Summarize: POST {}/api/summarize", config.server_url());
    println!("   Upload:    POST {}/api/upload", config.server_url());
    println!("   Press Ctrl+C to stop");

    let state = Arc::new(server::AppState::new(config, Arc::new(gemini_client)));
    server::start_server(state).await?;

    Ok(())
}
