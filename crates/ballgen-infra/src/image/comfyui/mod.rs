//! ComfyUiProvider -- [`ImageProvider`] for a self-hosted ComfyUI server.
//!
//! ComfyUI is asynchronous: a workflow is queued with `POST /prompt`, its
//! progress shows up under `GET /history/{prompt_id}`, and the finished file
//! is downloaded from `GET /view`. The whole exchange runs under one
//! deadline (`image.timeout_secs`); transient poll errors are logged and
//! polling continues until that deadline.

pub mod workflow;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use ballgen_core::image::provider::ImageProvider;
use ballgen_types::config::ImageSettings;
use ballgen_types::image::{GeneratedImage, ImageError, ImageRequest, ImageSize};

use self::workflow::{SAVE_NODE, build_workflow};

/// A file reference from the SaveImage node output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputImage {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default = "default_folder_type")]
    pub folder_type: String,
}

fn default_folder_type() -> String {
    "output".to_string()
}

#[derive(Debug, Deserialize)]
struct QueueResponse {
    prompt_id: String,
}

pub struct ComfyUiProvider {
    client: reqwest::Client,
    base_url: String,
    settings: ImageSettings,
    size: ImageSize,
    client_id: String,
}

impl ComfyUiProvider {
    pub fn new(settings: &ImageSettings) -> Result<Self, ImageError> {
        let size = settings.size().map_err(ImageError::InvalidSettings)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| ImageError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.comfyui_url.trim_end_matches('/').to_string(),
            settings: settings.clone(),
            size,
            client_id: Uuid::now_v7().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn submit(&self, workflow: &Value) -> Result<String, ImageError> {
        let response = self
            .client
            .post(self.url("/prompt"))
            .json(&json!({ "prompt": workflow, "client_id": self.client_id }))
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let queued: QueueResponse = response
            .json()
            .await
            .map_err(|e| ImageError::MalformedResponse(format!("queue response: {e}")))?;
        tracing::debug!(prompt_id = %queued.prompt_id, "workflow queued");
        Ok(queued.prompt_id)
    }

    async fn history(&self, prompt_id: &str) -> Result<JobState, ImageError> {
        let response = self
            .client
            .get(self.url(&format!("/history/{prompt_id}")))
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let history: Value = response
            .json()
            .await
            .map_err(|e| ImageError::MalformedResponse(format!("history response: {e}")))?;

        job_state(&history, prompt_id)
    }

    async fn poll(&self, prompt_id: &str) -> Result<OutputImage, ImageError> {
        let interval = Duration::from_millis(self.settings.poll_interval_ms.max(1));
        loop {
            match self.history(prompt_id).await {
                Ok(JobState::Done(image)) => return Ok(image),
                Ok(JobState::Pending) => {}
                Ok(JobState::Failed) => {
                    return Err(ImageError::MalformedResponse(format!(
                        "workflow {prompt_id} failed on the server"
                    )));
                }
                Err(e) => tracing::warn!(error = %e, prompt_id, "history poll failed; retrying"),
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn fetch(&self, image: &OutputImage) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(self.url("/view"))
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.folder_type.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    async fn run(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let workflow = build_workflow(&self.settings, self.size, prompt, u64::from(rand::random::<u32>()));
        let prompt_id = self.submit(&workflow).await?;
        let output = self.poll(&prompt_id).await?;
        let bytes = self.fetch(&output).await?;

        Ok(GeneratedImage {
            bytes,
            extension: extension_of(&output.filename),
        })
    }
}

/// Progress of a queued workflow as seen in `/history`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Done(OutputImage),
    Failed,
}

/// Read the state of `prompt_id` from a `/history` payload.
pub fn job_state(history: &Value, prompt_id: &str) -> Result<JobState, ImageError> {
    let Some(entry) = history.get(prompt_id) else {
        return Ok(JobState::Pending);
    };

    if entry["status"]["status_str"].as_str() == Some("error") {
        return Ok(JobState::Failed);
    }

    match entry["outputs"][SAVE_NODE]["images"].get(0) {
        Some(image) => serde_json::from_value(image.clone())
            .map(JobState::Done)
            .map_err(|e| ImageError::MalformedResponse(format!("output image: {e}"))),
        None => Ok(JobState::Pending),
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "png".to_string())
}

fn transport(err: reqwest::Error) -> ImageError {
    ImageError::Transport(err.to_string())
}

pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ImageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ImageError::Http {
        status: status.as_u16(),
        body,
    })
}

impl ImageProvider for ComfyUiProvider {
    fn name(&self) -> &str {
        "comfyui"
    }

    #[tracing::instrument(
        name = "generate_image",
        skip(self, request),
        fields(provider = "comfyui", size = %self.size, prompt_len = request.prompt.len())
    )]
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
        let secs = self.settings.timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), self.run(&request.prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = secs, "image generation exceeded its deadline");
                Err(ImageError::Timeout { secs })
            }
        }
    }
}
