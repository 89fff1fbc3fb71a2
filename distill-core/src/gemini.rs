//! Gemini REST client.
//!
//! This module talks to the Generative Language API `generateContent`
//! endpoint over HTTPS and maps its failure modes onto [`GeminiError`].

use crate::config::GeminiConfig;
use crate::summarize::{GenerationError, Generator};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur when calling the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API key is not configured. Set GEMINI_API_KEY or gemini.api_key.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication error ({status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid JSON response from Gemini: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Gemini returned no text{}", .0.as_ref().map(|r| format!(" (blocked: {})", r)).unwrap_or_default())]
    EmptyResponse(Option<String>),
}

/// Request to send to Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiRequest {
    /// The model to use (e.g., "gemini-1.5-flash")
    pub model: String,

    /// The prompt to send
    pub prompt: String,
}

impl GeminiRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Response from Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiResponse {
    /// Concatenated text of the first candidate
    pub text: String,

    /// Model used
    pub model: String,

    /// Why generation stopped, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

// Wire format of the generateContent endpoint

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Client for the Gemini REST API
pub struct GeminiClient {
    http: reqwest::Client,

    /// API key sent as `x-goog-api-key`
    api_key: Option<String>,

    /// Default model to use
    default_model: String,

    /// API root, without trailing slash
    base_url: String,

    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiClient {
    /// Create a new GeminiClient against the public API
    pub fn new(api_key: Option<String>, default_model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            default_model: default_model.into(),
            base_url: GeminiConfig::default().base_url,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Create a client from configuration
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether an API key is present. No network call is made.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Call Gemini with a text prompt
    #[instrument(skip(self, req), fields(model = %req.model, prompt_len = req.prompt.len()))]
    pub async fn call_text(&self, req: &GeminiRequest) -> Result<GeminiResponse, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        let generation_config = (self.temperature.is_some() || self.max_output_tokens.is_some())
            .then(|| GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            });

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &req.prompt }],
            }],
            generation_config,
        };

        debug!("Calling Gemini API with model: {}", req.model);

        let response = self
            .http
            .post(self.endpoint(&req.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!("Gemini API status: {}", status);

        if !status.is_success() {
            return Err(classify_failure(status, text));
        }

        parse_response(&text, &req.model)
    }
}

/// Map a non-success status onto an error variant
fn classify_failure(status: StatusCode, body: String) -> GeminiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GeminiError::Authentication {
            status: status.as_u16(),
            body,
        },
        StatusCode::TOO_MANY_REQUESTS => GeminiError::RateLimited(body),
        _ => GeminiError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

/// Pull the first candidate's text out of a generateContent body
fn parse_response(body: &str, model: &str) -> Result<GeminiResponse, GeminiError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)?;

    let block_reason = parsed.prompt_feedback.and_then(|f| f.block_reason);

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Err(GeminiError::EmptyResponse(block_reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = &candidate.finish_reason {
            warn!("Gemini candidate had no text (finish reason: {})", reason);
        }
        return Err(GeminiError::EmptyResponse(block_reason));
    }

    Ok(GeminiResponse {
        text,
        model: model.to_string(),
        finish_reason: candidate.finish_reason,
    })
}

#[async_trait]
impl Generator for GeminiClient {
    fn name(&self) -> &str {
        &self.default_model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GeminiRequest::new(&self.default_model, prompt);
        let response = self.call_text(&request).await?;
        Ok(response.text)
    }
}
