//! `distill extract` command - Print text extracted from a document

use anyhow::{bail, Result};
use distill_core::extract;
use std::path::PathBuf;
use tracing::info;

pub async fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    let path = file.clone();
    let extracted = tokio::task::spawn_blocking(move || extract::extract_file(&path)).await??;

    info!(
        "Extracted {} chars from {}",
        extracted.char_count(),
        file.display()
    );
    println!("{}", extracted.text);

    Ok(())
}
