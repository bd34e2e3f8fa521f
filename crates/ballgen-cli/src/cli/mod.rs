//! CLI command definitions for the `ballgen` binary.
//!
//! Uses clap derive macros for argument parsing. Global flags control output
//! and logging; per-command flags override selected config fields.

pub mod config;
pub mod deploy;
pub mod generate;
pub mod normalize;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ballgen_types::config::GlobalConfig;
use ballgen_types::content::ContentKind;
use ballgen_types::image::ImageProviderType;
use ballgen_types::llm::TextProviderType;

/// Generate humorous ball stories and fake news for a static site.
#[derive(Parser)]
#[command(name = "ballgen", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./ballgen.toml, then the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// API key for the hosted text and image backends.
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one piece of content and publish it.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Run only the normalizer on a saved model response.
    Normalize(NormalizeArgs),

    /// Build and push the site without generating anything.
    Deploy,

    /// Print the effective configuration as TOML.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Content kind: story or article.
    #[arg(long, default_value = "story")]
    pub kind: ContentKind,

    /// Ball type to write about (random when omitted).
    #[arg(long)]
    pub topic: Option<String>,

    /// News category for articles (random when omitted).
    #[arg(long)]
    pub category: Option<String>,

    /// Publish without images.
    #[arg(long)]
    pub no_images: bool,

    /// Write the document but skip the build-and-push step.
    #[arg(long)]
    pub no_deploy: bool,

    /// Mark the document as a draft.
    #[arg(long)]
    pub draft: bool,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// File holding the raw model response (stdin when omitted).
    pub file: Option<PathBuf>,

    #[arg(long, default_value = "story")]
    pub kind: ContentKind,

    /// Topic the response was generated for.
    #[arg(long, default_value = "ball")]
    pub topic: String,
}

/// Flags layered over the loaded configuration.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Text backend: ollama or openai.
    #[arg(long, global = true)]
    pub text_provider: Option<TextProviderType>,

    /// Image backend: comfyui or dalle.
    #[arg(long, global = true)]
    pub image_provider: Option<ImageProviderType>,

    /// Root of the static site.
    #[arg(long, global = true, value_name = "DIR")]
    pub site_root: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut GlobalConfig) {
        if let Some(provider) = self.text_provider {
            config.text.provider = provider;
        }
        if let Some(provider) = self.image_provider {
            config.image.provider = provider;
        }
        if let Some(ref root) = self.site_root {
            config.content.site_root = root.clone();
        }
    }
}
