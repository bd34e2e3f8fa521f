//! TextProvider trait definition.
//!
//! This is the core abstraction that all text backends implement.

use ballgen_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-generation backends (Ollama, OpenAI, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Implementations
/// live in ballgen-infra (e.g., `OllamaProvider`).
pub trait TextProvider: Send + Sync {
    /// Short provider name (e.g., "ollama", "openai"); also used as a tag.
    fn name(&self) -> &str;

    /// Model identifier used when the request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send one prompt and receive the full, untrusted text response.
    fn generate_text(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
