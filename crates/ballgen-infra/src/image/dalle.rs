//! DalleProvider -- [`ImageProvider`] for the hosted DALL-E images API.
//!
//! Synchronous shape: one `POST /images/generations`, whose reply carries
//! either a download URL or inline base64 data.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ballgen_core::image::provider::ImageProvider;
use ballgen_types::config::ImageSettings;
use ballgen_types::image::{GeneratedImage, ImageError, ImageRequest};

use super::comfyui::check_status;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedItem>,
}

#[derive(Debug, Deserialize)]
struct GeneratedItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

/// Does NOT derive Debug: holds the API key.
pub struct DalleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    size: String,
    quality: String,
    timeout_secs: u64,
}

impl DalleProvider {
    pub fn new(settings: &ImageSettings, api_key: SecretString) -> Result<Self, ImageError> {
        let timeout_secs = settings.timeout_secs.max(1);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ImageError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.dalle_base_url.trim_end_matches('/').to_string(),
            model: settings.dalle_model.clone(),
            size: settings.dalle_size.clone(),
            quality: settings.dalle_quality.clone(),
            timeout_secs,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl ImageProvider for DalleProvider {
    fn name(&self) -> &str {
        "dalle"
    }

    #[tracing::instrument(
        name = "generate_image",
        skip(self, request),
        fields(provider = "dalle", model = %self.model, size = %self.size)
    )]
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
        let body = GenerationRequest {
            model: &self.model,
            prompt: &request.prompt,
            size: &self.size,
            quality: &self.quality,
            n: 1,
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ImageError::Transport(e.to_string())
                }
            })?;
        let response = check_status(response).await?;

        let reply: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageError::MalformedResponse(e.to_string()))?;
        let item = reply
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageError::MalformedResponse("no images in response".to_string()))?;

        let bytes = match (item.b64_json, item.url) {
            (Some(data), _) => STANDARD
                .decode(data.trim())
                .map_err(|e| ImageError::MalformedResponse(format!("invalid base64 image: {e}")))?,
            (None, Some(url)) => self.download(&url).await?,
            (None, None) => {
                return Err(ImageError::MalformedResponse(
                    "image carries neither url nor data".to_string(),
                ));
            }
        };

        Ok(GeneratedImage {
            bytes,
            extension: "png".to_string(),
        })
    }
}
