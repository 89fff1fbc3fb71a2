//! `distill config` commands - View and manage configuration

use anyhow::Result;
use distill_core::Config;

/// Show current configuration
pub fn show(config: Config) -> Result<()> {
    let api_key = match &config.gemini.api_key {
        Some(key) => mask(key),
        None => "(not set)".to_string(),
    };

    println!("╭─────────────────────────────────────────╮");
    println!("│         Distill Configuration           │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Gemini                                  │");
    println!("│   Model:        {:<23} │", config.gemini.model);
    println!("│   API key:      {:<23} │", api_key);
    println!("│   Base URL:     {:<23} │", truncate(&config.gemini.base_url, 23));
    if config.gemini.timeout_secs > 0 {
        println!("│   Timeout:      {:<23} │", format!("{}s", config.gemini.timeout_secs));
    }
    println!("├─────────────────────────────────────────┤");
    println!("│ Server                                  │");
    println!("│   Host:         {:<23} │", config.server.host);
    println!("│   Port:         {:<23} │", config.server.port);
    println!("│   URL:          {:<23} │", config.server_url());
    println!(
        "│   Max upload:   {:<23} │",
        format!("{} KiB", config.server.max_upload_bytes / 1024)
    );
    println!("├─────────────────────────────────────────┤");
    println!("│ Logging                                 │");
    println!("│   Level:        {:<23} │", config.logging.level);
    println!("╰─────────────────────────────────────────╯");

    if let Some(path) = Config::default_config_path() {
        let exists = path.exists();
        println!(
            "\n📁 Config: {} {}",
            path.display(),
            if exists { "✓" } else { "(not created)" }
        );
    }

    Ok(())
}

/// Initialize default configuration
pub fn init(force: bool) -> Result<()> {
    let path = Config::default_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    if path.exists() && !force {
        println!(
            "⚠️  Configuration file already exists at: {}",
            path.display()
        );
        println!("   Use --force to overwrite.");
        return Ok(());
    }

    // The API key stays out of the file; it belongs in GEMINI_API_KEY
    let config = Config::default();
    config.save()?;

    println!("✅ Created configuration file at: {}", path.display());
    println!("\n📝 Default configuration:");
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", visible)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("abcdefgh1234"), "****1234");
        assert_eq!(mask("xy"), "****xy");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 23), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
