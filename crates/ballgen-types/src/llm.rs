//! Text-generation request/response types for ballgen.
//!
//! These types model the data shapes for text backend interactions:
//! completion requests, responses, usage tracking, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format hint passed to the backend.
///
/// Backends that cannot enforce a format ignore the hint; the normalizer
/// never relies on it being honoured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "schema", rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
    JsonSchema(serde_json::Value),
}

/// Request to a text backend for a single completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier; empty means "use the provider's configured model".
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub format: ResponseFormat,
}

/// Response from a text backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Raw, untrusted model text.
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from text backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request timed out")]
    Timeout,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Text backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProviderType {
    /// Locally hosted model served by Ollama.
    Ollama,
    /// Hosted OpenAI-compatible chat completions API.
    #[serde(rename = "openai")]
    OpenAi,
}

impl fmt::Display for TextProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextProviderType::Ollama => write!(f, "ollama"),
            TextProviderType::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for TextProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase().as_str() {
            "ollama" | "local" => Ok(TextProviderType::Ollama),
            "openai" | "hosted" => Ok(TextProviderType::OpenAi),
            other => Err(format!("invalid text provider: '{other}'")),
        }
    }
}
