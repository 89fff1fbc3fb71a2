//! Distill CLI
//!
//! Runs the summarization server, or summarizes and extracts documents
//! directly from the command line.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use distill_core::{Config, SummaryLength, SummaryStyle};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Distill - style- and length-controlled summaries with Gemini
#[derive(Parser)]
#[command(name = "distill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model to use (overrides config)
    #[arg(short, long, global = true, env = "DISTILL_MODEL")]
    model: Option<String>,

    /// Server port (overrides config)
    #[arg(long, global = true, env = "DISTILL_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DISTILL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Summarize a file (txt, md, pdf, docx) or stdin
    Summarize {
        /// File to summarize (reads stdin if omitted)
        file: Option<PathBuf>,

        /// academic, simple, bullet or narrative
        #[arg(short, long, default_value = "simple")]
        style: SummaryStyle,

        /// very-short, short, medium, long or detailed
        #[arg(short, long, default_value = "medium")]
        length: SummaryLength,

        /// Write the summary to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print size statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Print the text extracted from a document
    Extract {
        /// File to extract (txt, md, pdf, docx)
        file: PathBuf,
    },

    /// Check whether a server is running
    Status,

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Initialize default configuration
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    // Apply CLI overrides
    if let Some(model) = &cli.model {
        config.gemini.model = model.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;

    init_logging(&config.logging.level);

    match cli.command {
        Commands::Serve => commands::serve::run(config).await,
        Commands::Summarize {
            file,
            style,
            length,
            output,
            stats,
        } => commands::summarize::run(config, file, style, length, output, stats).await,
        Commands::Extract { file } => commands::extract::run(file).await,
        Commands::Status => commands::status::run(config).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(config),
            ConfigCommands::Init { force } => commands::config::init(force),
        },
    }
}
