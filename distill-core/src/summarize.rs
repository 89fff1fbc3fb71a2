//! Summarization gateway.
//!
//! Builds the prompt for a validated request and hands it to a
//! [`Generator`] exactly once. There is no retry and no streaming; a
//! failed call surfaces immediately as [`GenerationError`].

use crate::gemini::GeminiError;
use crate::model::SummaryParams;
use crate::prompt::build_prompt;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Failure of the external text generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("Generation failed: {0}")]
    Provider(String),
}

/// A text-completion capability: prompt in, text out
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable provider or model name, used in logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Turns summary requests into a single generator call
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn Generator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Summarize `params.text` in the requested style and length
    #[instrument(skip(self, params), fields(style = %params.style, length = %params.length, text_len = params.text.len()))]
    pub async fn summarize(&self, params: &SummaryParams) -> Result<String, GenerationError> {
        let prompt = build_prompt(&params.text, params.style, params.length);
        debug!(
            "Sending {} char prompt to {}",
            prompt.len(),
            self.generator.name()
        );

        let summary = self.generator.generate(&prompt).await?;

        info!("Summary generated ({} chars)", summary.len());
        Ok(summary)
    }
}
