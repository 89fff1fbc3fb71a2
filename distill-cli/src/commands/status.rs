//! `distill status` command - Check server status

use anyhow::Result;
use distill_core::{Config, HealthResponse};

pub async fn run(config: Config) -> Result<()> {
    let url = format!("{}/health", config.server_url());

    println!("Checking Distill server status...");
    println!("URL: {}", url);

    match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => {
            let health: HealthResponse = response.json().await?;

            println!("\n✅ Distill server is running");
            println!("   Status:   {}", health.status);
            println!("   Version:  {}", health.version);
            println!("   Model:    {}", health.model);
            println!(
                "   API key:  {}",
                if health.api_key_configured {
                    "configured ✓"
                } else {
                    "missing ⚠ (set GEMINI_API_KEY)"
                }
            );
        }
        Ok(response) => {
            println!(
                "\n⚠️  Distill server responded with status: {}",
                response.status()
            );
        }
        Err(_) => {
            println!("\n❌ Distill server is not running");
            println!("   Start it with: distill serve");
        }
    }

    Ok(())
}
