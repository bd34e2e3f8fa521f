//! Image-generation request/response types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixel dimensions, written `WIDTHxHEIGHT` in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid image size: '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid image width: '{w}'"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid image height: '{h}'"))?;
        Ok(Self { width, height })
    }
}

/// Request for one illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Already-sanitized prompt.
    pub prompt: String,
}

/// Image bytes returned by any backend, whatever its wire shape.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    /// File extension without the dot.
    pub extension: String,
}

/// Errors from image backend operations. Always non-fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("image generation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("API key required for image provider '{0}'")]
    MissingApiKey(String),

    #[error("invalid image settings: {0}")]
    InvalidSettings(String),
}

/// Image backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageProviderType {
    /// Self-hosted ComfyUI diffusion server (submit / poll / fetch).
    #[serde(rename = "comfyui")]
    ComfyUi,
    /// Hosted DALL-E image API (single request/response).
    Dalle,
}

impl fmt::Display for ImageProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageProviderType::ComfyUi => write!(f, "comfyui"),
            ImageProviderType::Dalle => write!(f, "dalle"),
        }
    }
}

impl FromStr for ImageProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comfyui" | "comfy" => Ok(ImageProviderType::ComfyUi),
            "dalle" | "dall-e" => Ok(ImageProviderType::Dalle),
            other => Err(format!("unknown image provider: '{other}'")),
        }
    }
}
