//! Application state: the loaded configuration and the wiring that turns it
//! into concrete backends, store and deployer.

use std::path::Path;

use anyhow::Context;
use secrecy::SecretString;

use ballgen_core::image::box_provider::BoxImageProvider;
use ballgen_core::pipeline::Pipeline;
use ballgen_infra::config::{load_config, resolve_config_path};
use ballgen_infra::deploy::SiteDeployer;
use ballgen_infra::image::create_image_provider;
use ballgen_infra::llm::create_text_provider;
use ballgen_infra::storage::LocalContentStore;
use ballgen_types::config::GlobalConfig;

use crate::cli::ConfigOverrides;

/// Pipeline pinned to the filesystem store and subprocess deployer.
pub type SitePipeline = Pipeline<LocalContentStore, SiteDeployer>;

pub struct AppState {
    pub config: GlobalConfig,
    api_key: Option<SecretString>,
}

impl AppState {
    /// Load the config file, then layer CLI overrides on top.
    pub async fn init(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
        api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = match resolve_config_path(config_path) {
            Some(path) => load_config(&path).await,
            None => GlobalConfig::default(),
        };
        overrides.apply(&mut config);

        Ok(Self::new(config, api_key.filter(|k| !k.trim().is_empty()).map(SecretString::from)))
    }

    pub fn new(config: GlobalConfig, api_key: Option<SecretString>) -> Self {
        Self { config, api_key }
    }

    pub fn deployer(&self) -> SiteDeployer {
        SiteDeployer::new(&self.config.deploy, &self.config.content.site_root)
    }

    /// Image backend, or `None` when images are off or the backend can't be
    /// built. The latter only warns: documents publish without images.
    pub fn image_provider(&self, wanted: bool) -> Option<BoxImageProvider> {
        if !wanted || !self.config.image.enabled {
            return None;
        }
        match create_image_provider(&self.config.image, self.api_key.as_ref()) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!(error = %e, "image backend unavailable; publishing without images");
                None
            }
        }
    }

    pub fn pipeline(&self, generate_images: bool) -> anyhow::Result<SitePipeline> {
        let text = create_text_provider(&self.config.text, self.api_key.as_ref())
            .with_context(|| format!("failed to set up text backend '{}'", self.config.text.provider))?;

        Ok(Pipeline::new(
            text,
            self.image_provider(generate_images),
            LocalContentStore::new(&self.config.content),
            self.deployer(),
            self.config.clone(),
        ))
    }
}
