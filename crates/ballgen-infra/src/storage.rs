//! Local filesystem content store.
//!
//! Implements [`ContentStore`] from `ballgen-core` on top of `tokio::fs`.
//! Layout under the site root:
//! ```text
//! {site_root}/
//!   {content_dir}/[{subdir}/]YYYY-MM-DD-slug-HHMMSS.md
//!   {images_dir}/image-YYYYMMDDHHMMSS.png
//! ```

use std::path::{Path, PathBuf};

use ballgen_core::publish::ContentStore;
use ballgen_types::config::ContentSettings;
use ballgen_types::content::ImageReference;
use ballgen_types::error::PublishError;

/// Writes documents and images into a static-site source tree.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    site_root: PathBuf,
    images_dir: PathBuf,
    image_url_prefix: String,
}

impl LocalContentStore {
    pub fn new(settings: &ContentSettings) -> Self {
        let site_root = PathBuf::from(&settings.site_root);
        Self {
            images_dir: site_root.join(&settings.images_dir),
            site_root,
            image_url_prefix: settings.image_url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }
}

async fn ensure_parent(path: &Path) -> Result<(), PublishError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PublishError::FileSystem(format!("{}: {e}", parent.display())))?;
    }
    Ok(())
}

impl ContentStore for LocalContentStore {
    async fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<ImageReference, PublishError> {
        let path = self.images_dir.join(file_name);
        ensure_parent(&path).await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PublishError::FileSystem(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved image");
        Ok(ImageReference {
            url: format!("{}/{file_name}", self.image_url_prefix),
        })
    }

    async fn write_document(&self, relative_path: &Path, contents: &str) -> Result<PathBuf, PublishError> {
        let path = self.site_root.join(relative_path);
        ensure_parent(&path).await?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| PublishError::FileSystem(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "wrote document");
        Ok(path)
    }
}
