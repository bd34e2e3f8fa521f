//! Publishing ports and output naming.
//!
//! `ContentStore` and `Deployer` are implemented in ballgen-infra
//! (`LocalContentStore`, `SiteDeployer`). The naming helpers here are pure so
//! paths can be tested without touching the filesystem.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use ballgen_types::config::ContentSettings;
use ballgen_types::content::{ContentKind, ImageReference};
use ballgen_types::error::{DeployError, PublishError};

use crate::sanitize::clean_title_with_limit;

/// Where documents and images end up.
pub trait ContentStore: Send + Sync {
    /// Store image bytes under `file_name` and return the reference used in
    /// the document.
    fn save_image(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = Result<ImageReference, PublishError>> + Send;

    /// Write a document at `relative_path` (relative to the site root),
    /// creating parent directories. Returns the full path written.
    fn write_document(
        &self,
        relative_path: &Path,
        contents: &str,
    ) -> impl std::future::Future<Output = Result<PathBuf, PublishError>> + Send;
}

/// External build-and-publish step. All-or-nothing, never retried.
pub trait Deployer: Send + Sync {
    fn deploy(
        &self,
        commit_message: &str,
    ) -> impl std::future::Future<Output = Result<(), DeployError>> + Send;
}

/// `{content_dir}/{kind subdir?}/{YYYY-MM-DD}-{slug}-{HHMMSS}.md`, relative to
/// the site root.
pub fn document_path(
    settings: &ContentSettings,
    kind: ContentKind,
    title: &str,
    now: NaiveDateTime,
) -> PathBuf {
    let mut path = PathBuf::from(&settings.content_dir);
    let subdir = match kind {
        ContentKind::Story => settings.story_subdir.as_deref(),
        ContentKind::Article => settings.article_subdir.as_deref(),
    };
    if let Some(subdir) = subdir.filter(|s| !s.trim().is_empty()) {
        path.push(subdir);
    }

    path.push(format!(
        "{}-{}-{}.md",
        now.format("%Y-%m-%d"),
        slug(title, settings.title_max_len),
        now.format("%H%M%S")
    ));
    path
}

/// Lowercase path slug; `untitled` when nothing usable is left.
pub fn slug(title: &str, max_len: usize) -> String {
    let slug = clean_title_with_limit(title, max_len).to_ascii_lowercase();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// `{prefix}-{YYYYMMDDHHMMSS}.{extension}`
pub fn image_file_name(prefix: &str, now: NaiveDateTime, extension: &str) -> String {
    format!("{prefix}-{}.{extension}", now.format("%Y%m%d%H%M%S"))
}

pub fn commit_message(prefix: &str, now: NaiveDateTime) -> String {
    format!("{prefix} {}", now.format("%Y-%m-%d %H:%M:%S"))
}
