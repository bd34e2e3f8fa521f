//! BoxTextProvider -- object-safe dynamic dispatch wrapper for TextProvider.
//!
//! 1. Define an object-safe `TextProviderDyn` trait with boxed futures
//! 2. Blanket-impl `TextProviderDyn` for all `T: TextProvider`
//! 3. `BoxTextProvider` wraps `Box<dyn TextProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use ballgen_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::TextProvider;

/// Object-safe version of [`TextProvider`] with boxed futures.
pub trait TextProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn generate_text_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

impl<T: TextProvider> TextProviderDyn for T {
    fn name(&self) -> &str {
        TextProvider::name(self)
    }

    fn model(&self) -> &str {
        TextProvider::model(self)
    }

    fn generate_text_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.generate_text(request))
    }
}

/// Type-erased text backend, selected from configuration at startup.
///
/// Since `TextProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxTextProvider` provides equivalent methods that delegate to
/// the inner `TextProviderDyn` trait object.
pub struct BoxTextProvider {
    inner: Box<dyn TextProviderDyn + Send + Sync>,
}

impl BoxTextProvider {
    /// Wrap a concrete `TextProvider` in a type-erased box.
    pub fn new<T: TextProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn generate_text(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.generate_text_boxed(request).await
    }
}
