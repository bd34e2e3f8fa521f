//! Global configuration types for ballgen.
//!
//! `GlobalConfig` represents the top-level `config.toml`. It is constructed
//! once at process start and handed by reference to each component; every
//! field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::image::{ImageProviderType, ImageSize};
use crate::llm::TextProviderType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub text: TextSettings,
    pub image: ImageSettings,
    pub content: ContentSettings,
    pub deploy: DeploySettings,
}

/// Text backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub provider: TextProviderType,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    pub ollama_model: String,
    /// Seconds Ollama keeps the model loaded after the call (0 unloads at once).
    pub ollama_keep_alive: i64,
    pub openai_base_url: String,
    pub openai_model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub timeout_secs: u64,
}

impl TextSettings {
    /// Model identifier of the selected backend.
    pub fn model(&self) -> &str {
        match self.provider {
            TextProviderType::Ollama => &self.ollama_model,
            TextProviderType::OpenAi => &self.openai_model,
        }
    }
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            provider: TextProviderType::Ollama,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "gemma3:12b".to_string(),
            ollama_keep_alive: 0,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1024,
            temperature: None,
            timeout_secs: 300,
        }
    }
}

/// Image backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Master switch; when off, documents are published without images.
    pub enabled: bool,
    pub provider: ImageProviderType,
    pub comfyui_url: String,
    /// `WIDTHxHEIGHT` of the diffusion canvas.
    pub resolution: String,
    pub steps: u32,
    pub cfg: f64,
    /// Human-readable sampler name shown in the generation trailer.
    pub sampler: String,
    /// ComfyUI `sampler_name` value.
    pub sampler_name: String,
    pub scheduler: String,
    /// Checkpoint file loaded by ComfyUI.
    pub model: String,
    /// Appended to every positive prompt.
    pub style_suffix: String,
    pub negative_prompt: String,
    pub poll_interval_ms: u64,
    /// Hard ceiling on a single image generation, submit to download.
    pub timeout_secs: u64,
    pub dalle_base_url: String,
    pub dalle_model: String,
    pub dalle_size: String,
    pub dalle_quality: String,
}

impl ImageSettings {
    /// Parsed diffusion canvas size.
    pub fn size(&self) -> Result<ImageSize, String> {
        self.resolution.parse()
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ImageProviderType::ComfyUi,
            comfyui_url: "http://localhost:8188".to_string(),
            resolution: "768x768".to_string(),
            steps: 30,
            cfg: 7.0,
            sampler: "DPM++ 2M".to_string(),
            sampler_name: "dpmpp_2m".to_string(),
            scheduler: "normal".to_string(),
            model: "sd3_medium_incl_clips_t5xxlfp16.safetensors".to_string(),
            style_suffix: "cute and humorous, vibrant colors, clean lines, detailed background, \
                           high quality, realistic, detailed, 4k, 8k"
                .to_string(),
            negative_prompt: "blurry, bad quality, distorted, deformed, ugly, amateur, \
                              low resolution, pixelated, grainy, text, watermark, signature"
                .to_string(),
            poll_interval_ms: 1000,
            timeout_secs: 120,
            dalle_base_url: "https://api.openai.com/v1".to_string(),
            dalle_model: "dall-e-3".to_string(),
            dalle_size: "1024x1024".to_string(),
            dalle_quality: "standard".to_string(),
        }
    }
}

/// Content shape and output layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub min_words: u32,
    pub max_words: u32,
    /// Root of the static site; every other path is relative to it.
    pub site_root: String,
    pub content_dir: String,
    pub images_dir: String,
    /// URL prefix under which `images_dir` is served.
    pub image_url_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_subdir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_subdir: Option<String>,
    /// Upper bound on title and slug length, in characters.
    pub title_max_len: usize,
    pub draft: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            min_words: 300,
            max_words: 400,
            site_root: ".".to_string(),
            content_dir: "content/en/posts".to_string(),
            images_dir: "static/images".to_string(),
            image_url_prefix: "/images".to_string(),
            story_subdir: None,
            article_subdir: Some("news".to_string()),
            title_max_len: 50,
            draft: false,
        }
    }
}

/// Build-and-publish step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub enabled: bool,
    /// Site build command, run in `site_root`. Empty skips the build.
    pub build_command: Vec<String>,
    pub commit: bool,
    pub push: bool,
    pub commit_message_prefix: String,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            build_command: vec!["hugo".to_string(), "--minify".to_string()],
            commit: true,
            push: true,
            commit_message_prefix: "Update content".to_string(),
        }
    }
}
