//! Configuration loader for ballgen.
//!
//! Reads a TOML file and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use ballgen_types::config::GlobalConfig;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ballgen.toml";

/// Pick the config file to load.
///
/// Priority:
/// 1. An explicit path (`--config`), whether or not it exists
/// 2. `./ballgen.toml` if present
/// 3. `{config_dir}/ballgen/config.toml` (e.g. `~/.config/ballgen/config.toml`)
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("ballgen").join("config.toml"))
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config; absent fields keep their defaults.
pub async fn load_config(path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GlobalConfig::default()
        }
    }
}

/// Render the effective configuration as TOML.
pub fn to_toml(config: &GlobalConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballgen_types::image::ImageProviderType;
    use ballgen_types::llm::TextProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("ballgen.toml")).await;
        assert_eq!(config.text.provider, TextProviderType::Ollama);
        assert_eq!(config.content.min_words, 300);
    }

    #[tokio::test]
    async fn load_config_partial_toml_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ballgen.toml");
        tokio::fs::write(
            &path,
            r#"
[text]
provider = "openai"
openai_model = "gpt-4o-mini"

[image]
provider = "dalle"

[content]
site_root = "/srv/site"
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.text.provider, TextProviderType::OpenAi);
        assert_eq!(config.text.openai_model, "gpt-4o-mini");
        assert_eq!(config.image.provider, ImageProviderType::Dalle);
        assert_eq!(config.content.site_root, "/srv/site");
        assert_eq!(config.content.images_dir, "static/images");
        assert!(config.deploy.enabled);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ballgen.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!").await.unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.text.provider, TextProviderType::Ollama);
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let explicit = Path::new("/etc/ballgen/custom.toml");
        assert_eq!(resolve_config_path(Some(explicit)), Some(explicit.to_path_buf()));
    }

    #[test]
    fn effective_config_round_trips_through_toml() {
        let rendered = to_toml(&GlobalConfig::default()).unwrap();
        assert!(rendered.contains("[text]"));
        assert!(rendered.contains("[deploy]"));
        let parsed: GlobalConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.image.resolution, "768x768");
    }
}
