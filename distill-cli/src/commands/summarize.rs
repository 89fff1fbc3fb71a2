//! `distill summarize` command - Summarize a document or stdin

use anyhow::{bail, Result};
use distill_core::{
    extract, Config, GeminiClient, Summarizer, SummaryLength, SummaryParams, SummaryStats,
    SummaryStyle,
};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Read all of stdin unless it is an interactive terminal
fn read_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(Some(buf))
}

pub async fn run(
    config: Config,
    file: Option<PathBuf>,
    style: SummaryStyle,
    length: SummaryLength,
    output: Option<PathBuf>,
    stats: bool,
) -> Result<()> {
    let text = match &file {
        Some(path) => {
            if !path.exists() {
                bail!("File not found: {}", path.display());
            }
            let path = path.clone();
            tokio::task::spawn_blocking(move || extract::extract_file(&path))
                .await??
                .text
        }
        None => match read_stdin()? {
            Some(text) => text,
            None => bail!(
                "No input provided. Usage: distill summarize FILE or echo \"text\" | distill summarize"
            ),
        },
    };

    if text.trim().is_empty() {
        bail!("No text provided");
    }

    debug!("Input: {} chars", text.len());

    let client = GeminiClient::from_config(&config.gemini)?;
    let summarizer = Summarizer::new(Arc::new(client));

    info!("Requesting {} / {} summary...", style, length);
    let params = SummaryParams::new(text, style, length);
    let summary = summarizer.summarize(&params).await?;

    match &output {
        Some(path) => {
            std::fs::write(path, &summary)?;
            eprintln!("✅ Summary written to {}", path.display());
        }
        None => println!("{}", summary),
    }

    if stats {
        eprintln!("📊 {}", SummaryStats::compute(&params.text, &summary));
    }

    Ok(())
}
