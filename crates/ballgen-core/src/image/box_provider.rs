//! BoxImageProvider -- object-safe wrapper for ImageProvider.
//!
//! Same blanket-impl pattern as [`crate::llm::box_provider`].

use std::future::Future;
use std::pin::Pin;

use ballgen_types::image::{GeneratedImage, ImageError, ImageRequest};

use super::provider::ImageProvider;

/// Object-safe version of [`ImageProvider`] with boxed futures.
pub trait ImageProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_image_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedImage, ImageError>> + Send + 'a>>;
}

impl<T: ImageProvider> ImageProviderDyn for T {
    fn name(&self) -> &str {
        ImageProvider::name(self)
    }

    fn generate_image_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedImage, ImageError>> + Send + 'a>> {
        Box::pin(self.generate_image(request))
    }
}

/// Type-erased image backend.
pub struct BoxImageProvider {
    inner: Box<dyn ImageProviderDyn + Send + Sync>,
}

impl BoxImageProvider {
    pub fn new<T: ImageProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ImageError> {
        self.inner.generate_image_boxed(request).await
    }
}
