//! Text backend implementations.
//!
//! Contains concrete implementations of the [`TextProvider`] trait defined in
//! `ballgen-core` and a factory ([`create_text_provider`]) that builds the
//! configured one.
//!
//! [`TextProvider`]: ballgen_core::llm::provider::TextProvider

pub mod ollama;
pub mod openai;

use secrecy::SecretString;

use ballgen_core::llm::box_provider::BoxTextProvider;
use ballgen_types::config::TextSettings;
use ballgen_types::llm::{LlmError, TextProviderType};

use self::ollama::OllamaProvider;
use self::openai::OpenAiProvider;

/// Create a [`BoxTextProvider`] for the backend selected in `settings`.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when the hosted backend is
/// selected without an API key.
pub fn create_text_provider(
    settings: &TextSettings,
    api_key: Option<&SecretString>,
) -> Result<BoxTextProvider, LlmError> {
    match settings.provider {
        TextProviderType::Ollama => Ok(BoxTextProvider::new(OllamaProvider::new(settings)?)),
        TextProviderType::OpenAi => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            Ok(BoxTextProvider::new(OpenAiProvider::new(settings, key)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_ollama_by_default() {
        let provider = create_text_provider(&TextSettings::default(), None).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "gemma3:12b");
    }

    #[test]
    fn test_factory_openai_requires_key() {
        let settings = TextSettings {
            provider: TextProviderType::OpenAi,
            ..TextSettings::default()
        };
        assert!(matches!(
            create_text_provider(&settings, None),
            Err(LlmError::AuthenticationFailed)
        ));

        let key = SecretString::from("sk-test".to_string());
        let provider = create_text_provider(&settings, Some(&key)).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-3.5-turbo");
    }
}
