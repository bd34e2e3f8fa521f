//! End-to-end generation pipeline.
//!
//! Stages run strictly in order, each awaited before the next:
//! prompt -> text backend -> normalize -> images -> render -> write -> deploy.
//! A text backend failure aborts the run before anything is written. Image
//! and deploy failures degrade the result instead of failing it.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use ballgen_types::config::GlobalConfig;
use ballgen_types::content::{ContentRequest, ImageReference, ImageSet, NormalizedContent, ResponseSource};
use ballgen_types::error::PublishError;
use ballgen_types::image::ImageRequest;
use ballgen_types::llm::{LlmError, Usage};

use crate::image::box_provider::BoxImageProvider;
use crate::llm::box_provider::BoxTextProvider;
use crate::normalize::Normalizer;
use crate::prompt::build_prompt;
use crate::publish::{ContentStore, Deployer, commit_message, document_path, image_file_name};
use crate::render::{GenerationDetails, render_document, to_markdown};

/// Errors that abort a run. Image and deploy problems are not among them.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),
}

/// Per-run switches, usually from CLI flags layered over config.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub generate_images: bool,
    pub deploy: bool,
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum DeployStatus {
    Skipped,
    Succeeded,
    Failed(String),
}

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub run_id: Uuid,
    pub path: PathBuf,
    pub title: String,
    pub source: ResponseSource,
    pub images: ImageSet,
    pub deploy: DeployStatus,
    /// Token counts reported by the text backend.
    pub usage: Usage,
}

pub struct Pipeline<S, D> {
    text: BoxTextProvider,
    image: Option<BoxImageProvider>,
    store: S,
    deployer: D,
    config: GlobalConfig,
    normalizer: Normalizer,
}

impl<S: ContentStore, D: Deployer> Pipeline<S, D> {
    pub fn new(
        text: BoxTextProvider,
        image: Option<BoxImageProvider>,
        store: S,
        deployer: D,
        config: GlobalConfig,
    ) -> Self {
        let normalizer = Normalizer::new(config.content.title_max_len);
        Self {
            text,
            image,
            store,
            deployer,
            config,
            normalizer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run(
        &self,
        request: &ContentRequest,
        options: RunOptions,
    ) -> Result<PublishOutcome, PipelineError> {
        self.run_at(request, options, Local::now().naive_local()).await
    }

    /// [`Pipeline::run`] with an explicit clock, for deterministic names.
    #[tracing::instrument(
        name = "pipeline.run",
        skip(self, options, now),
        fields(run_id = tracing::field::Empty, kind = %request.kind, topic = %request.topic)
    )]
    pub async fn run_at(
        &self,
        request: &ContentRequest,
        options: RunOptions,
        now: NaiveDateTime,
    ) -> Result<PublishOutcome, PipelineError> {
        let run_id = Uuid::now_v7();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let prompt = build_prompt(request, &self.config.content, &self.config.text);
        let response = self
            .text
            .generate_text(&prompt.request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, provider = self.text.name(), "text generation failed"))?;
        tracing::info!(provider = self.text.name(), model = %response.model, "text generated");

        let normalized = self.normalizer.normalize(&response.content, request);
        let mut content = normalized.content;
        content.add_tag(self.text.name());
        tracing::info!(source = %normalized.source, title = %content.title, "response normalized");

        let images = if options.generate_images {
            self.illustrate(&content, now).await
        } else {
            ImageSet::default()
        };

        let details = GenerationDetails {
            prompt_summary: prompt.summary,
            text_provider: self.text.name().to_string(),
            text_model: if response.model.is_empty() {
                self.text.model().to_string()
            } else {
                response.model.clone()
            },
            image_settings: match (&self.image, options.generate_images) {
                (Some(_), true) => GenerationDetails::describe_image_settings(&self.config.image),
                _ => Vec::new(),
            },
        };

        let document = render_document(&content, request.kind, &images, &details, now, options.draft);
        let markdown = to_markdown(&document)?;
        let relative = document_path(&self.config.content, request.kind, &content.title, now);
        let path = self.store.write_document(&relative, &markdown).await?;
        tracing::info!(path = %path.display(), "document written");

        let deploy = if options.deploy {
            let message = commit_message(&self.config.deploy.commit_message_prefix, now);
            match self.deployer.deploy(&message).await {
                Ok(()) => DeployStatus::Succeeded,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "deploy failed; document kept on disk");
                    DeployStatus::Failed(e.to_string())
                }
            }
        } else {
            DeployStatus::Skipped
        };

        Ok(PublishOutcome {
            run_id,
            path,
            title: content.title,
            source: normalized.source,
            images,
            deploy,
            usage: response.usage,
        })
    }

    /// Main image first; the scene image is only attempted when it worked.
    async fn illustrate(&self, content: &NormalizedContent, now: NaiveDateTime) -> ImageSet {
        let Some(provider) = &self.image else {
            return ImageSet::default();
        };

        let main = self
            .render_image(provider, &content.image_prompt, "image", now)
            .await;
        let scene = if main.is_some() {
            self.render_image(provider, &content.scene_prompt, "scene", now)
                .await
        } else {
            tracing::warn!("main image unavailable; skipping scene image");
            None
        };

        ImageSet { main, scene }
    }

    async fn render_image(
        &self,
        provider: &BoxImageProvider,
        prompt: &str,
        prefix: &str,
        now: NaiveDateTime,
    ) -> Option<ImageReference> {
        let request = ImageRequest {
            prompt: prompt.to_string(),
        };
        let image = match provider.generate_image(&request).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(error = %e, provider = provider.name(), prefix, "image generation failed");
                return None;
            }
        };

        let file_name = image_file_name(prefix, now, &image.extension);
        match self.store.save_image(&file_name, &image.bytes).await {
            Ok(reference) => Some(reference),
            Err(e) => {
                tracing::warn!(error = %e, file = %file_name, "failed to store image");
                None
            }
        }
    }
}
