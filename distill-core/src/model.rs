//! Shared data models for Distill.
//!
//! This module contains the summary style and length tiers, the JSON
//! request/response bodies of the HTTP API, and request validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Requested rhetorical form of a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    Academic,
    #[default]
    Simple,
    Bullet,
    Narrative,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 4] = [
        SummaryStyle::Academic,
        SummaryStyle::Simple,
        SummaryStyle::Bullet,
        SummaryStyle::Narrative,
    ];

    /// Wire name of the style
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Academic => "academic",
            SummaryStyle::Simple => "simple",
            SummaryStyle::Bullet => "bullet",
            SummaryStyle::Narrative => "narrative",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported summary style: {0}")]
pub struct ParseStyleError(pub String);

impl FromStr for SummaryStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}

/// Requested relative size of a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    VeryShort,
    Short,
    #[default]
    Medium,
    Long,
    Detailed,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 5] = [
        SummaryLength::VeryShort,
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Long,
        SummaryLength::Detailed,
    ];

    /// Wire name of the length tier
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::VeryShort => "very-short",
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
            SummaryLength::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported summary length: {0}")]
pub struct ParseLengthError(pub String);

impl FromStr for SummaryLength {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryLength::ALL
            .into_iter()
            .find(|length| length.as_str() == s)
            .ok_or_else(|| ParseLengthError(s.to_string()))
    }
}

/// Body of `POST /api/summarize` as received on the wire
///
/// Style and length stay strings here so that unknown values can be
/// reported as validation failures instead of body parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SummaryRequest {
    /// Text to summarize
    #[serde(default)]
    pub text: Option<String>,
    /// One of `academic`, `simple`, `bullet`, `narrative` (default `simple`)
    #[serde(default)]
    pub style: Option<String>,
    /// One of `very-short`, `short`, `medium`, `long`, `detailed` (default `medium`)
    #[serde(default)]
    pub length: Option<String>,
}

/// Reasons a summary request is rejected before reaching the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No text provided")]
    EmptyText,
    #[error(transparent)]
    Style(#[from] ParseStyleError),
    #[error(transparent)]
    Length(#[from] ParseLengthError),
}

/// A validated summary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryParams {
    pub text: String,
    pub style: SummaryStyle,
    pub length: SummaryLength,
}

impl SummaryParams {
    pub fn new(text: impl Into<String>, style: SummaryStyle, length: SummaryLength) -> Self {
        Self {
            text: text.into(),
            style,
            length,
        }
    }
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Check the request and resolve style and length tiers.
    ///
    /// The text is passed through verbatim; only its trimmed form is
    /// checked for emptiness.
    pub fn validate(self) -> Result<SummaryParams, ValidationError> {
        let text = match self.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ValidationError::EmptyText),
        };

        let style = match self.style.as_deref() {
            Some(s) => s.parse::<SummaryStyle>()?,
            None => SummaryStyle::default(),
        };
        let length = match self.length.as_deref() {
            Some(l) => l.parse::<SummaryLength>()?,
            None => SummaryLength::default(),
        };

        Ok(SummaryParams {
            text,
            style,
            length,
        })
    }
}

/// Body of a successful `POST /api/summarize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Body of a successful `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub text: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub api_key_configured: bool,
}
