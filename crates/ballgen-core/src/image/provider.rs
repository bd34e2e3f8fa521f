//! ImageProvider trait definition.

use ballgen_types::image::{GeneratedImage, ImageError, ImageRequest};

/// Trait for image-generation backends (ComfyUI, DALL-E).
///
/// Implementations hide their wire shape: an asynchronous submit/poll/fetch
/// backend resolves the returned future only once the bytes are in hand, or
/// once its time budget is spent.
pub trait ImageProvider: Send + Sync {
    /// Short provider name (e.g., "comfyui", "dalle").
    fn name(&self) -> &str;

    fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> impl std::future::Future<Output = Result<GeneratedImage, ImageError>> + Send;
}
