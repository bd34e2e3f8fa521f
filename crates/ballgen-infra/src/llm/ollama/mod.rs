//! OllamaProvider -- [`TextProvider`] for a locally hosted Ollama server.
//!
//! Sends a single non-streaming `POST /api/generate` and returns the
//! `response` field verbatim.

pub mod types;

use std::time::Duration;

use ballgen_core::llm::provider::TextProvider;
use ballgen_types::config::TextSettings;
use ballgen_types::llm::{CompletionRequest, CompletionResponse, LlmError, ResponseFormat, Usage};

use self::types::{GenerateOptions, GenerateRequest, GenerateResponse};

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    keep_alive: i64,
}

impl OllamaProvider {
    pub fn new(settings: &TextSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: settings.ollama_url.trim_end_matches('/').to_string(),
            model: settings.ollama_model.clone(),
            keep_alive: settings.ollama_keep_alive,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn format_hint(format: &ResponseFormat) -> Option<serde_json::Value> {
    match format {
        ResponseFormat::Text => None,
        ResponseFormat::Json => Some(serde_json::Value::String("json".to_string())),
        ResponseFormat::JsonSchema(schema) => Some(schema.clone()),
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Provider {
            message: format!("HTTP request failed: {err}"),
        }
    }
}

impl TextProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(
        name = "generate_text",
        skip(self, request),
        fields(provider = "ollama", model = %self.model, prompt_len = request.prompt.len())
    )]
    async fn generate_text(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };

        let body = GenerateRequest {
            model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            keep_alive: self.keep_alive,
            format: format_hint(&request.format),
            options: GenerateOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => LlmError::RateLimited,
                code => LlmError::Http {
                    status: code,
                    body: error_body,
                },
            });
        }

        let reply: GenerateResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        tracing::debug!(response_len = reply.response.len(), "ollama reply received");

        Ok(CompletionResponse {
            content: reply.response,
            model: if reply.model.is_empty() {
                model.to_string()
            } else {
                reply.model
            },
            usage: Usage {
                input_tokens: reply.prompt_eval_count.unwrap_or(0),
                output_tokens: reply.eval_count.unwrap_or(0),
            },
        })
    }
}
