//! # Distill Core
//!
//! Core library for Distill - a small summarization backend.
//!
//! This crate provides:
//! - Configuration management
//! - Text extraction from plain text, PDF and DOCX documents
//! - Prompt building for summary styles and length tiers
//! - A Gemini REST client behind the [`Generator`] capability
//! - HTTP API server (`/api/upload`, `/api/summarize`)
//! - Shared data models

pub mod config;
pub mod extract;
pub mod gemini;
pub mod model;
pub mod prompt;
pub mod server;
pub mod stats;
pub mod summarize;

pub use config::{Config, ConfigError, GeminiConfig, ServerConfig};
pub use extract::{ExtractError, ExtractedText, MediaType};
pub use gemini::{GeminiClient, GeminiError, GeminiRequest, GeminiResponse};
pub use model::*;
pub use prompt::build_prompt;
pub use stats::SummaryStats;
pub use summarize::{GenerationError, Generator, Summarizer};
