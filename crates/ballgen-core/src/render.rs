//! Document renderer: front matter plus markdown body, with the illustration
//! marker resolved to an image reference or removed.

use chrono::NaiveDateTime;

use ballgen_types::config::ImageSettings;
use ballgen_types::content::{
    ContentKind, FrontMatter, ImageReference, ImageSet, NormalizedContent, RenderedDocument,
    SCENE_MARKER,
};
use ballgen_types::error::PublishError;
use ballgen_types::image::ImageProviderType;

use crate::sanitize::{SENTENCE_TERMINATORS, collapse_whitespace};

/// Static-site separator between the excerpt and the full text.
pub const MORE_SEPARATOR: &str = "<!--more-->";

/// What produced the document, for the trailer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationDetails {
    pub prompt_summary: String,
    pub text_provider: String,
    pub text_model: String,
    /// Ordered `(label, value)` pairs; empty when images are disabled.
    pub image_settings: Vec<(String, String)>,
}

impl GenerationDetails {
    /// Trailer lines describing the configured image backend.
    pub fn describe_image_settings(settings: &ImageSettings) -> Vec<(String, String)> {
        let pairs = match settings.provider {
            ImageProviderType::ComfyUi => vec![
                ("Resolution", settings.resolution.clone()),
                ("Steps", settings.steps.to_string()),
                ("CFG", settings.cfg.to_string()),
                ("Sampler", settings.sampler.clone()),
                ("Model", settings.model.clone()),
            ],
            ImageProviderType::Dalle => vec![
                ("Resolution", settings.dalle_size.clone()),
                ("Quality", settings.dalle_quality.clone()),
                ("Model", settings.dalle_model.clone()),
            ],
        };
        pairs
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect()
    }
}

/// Assemble the document for `content`. Pure apart from `now`.
pub fn render_document(
    content: &NormalizedContent,
    kind: ContentKind,
    images: &ImageSet,
    details: &GenerationDetails,
    now: NaiveDateTime,
    draft: bool,
) -> RenderedDocument {
    let categories = match kind {
        ContentKind::Article if content.category.eq_ignore_ascii_case("news") => {
            vec!["news".to_string()]
        }
        ContentKind::Article => vec!["news".to_string(), content.category.clone()],
        ContentKind::Story => vec![content.category.clone()],
    };

    let front_matter = FrontMatter {
        title: content.title.clone(),
        date: now.format("%Y-%m-%d").to_string(),
        draft,
        categories,
        tags: content.tags.clone(),
        summary: content.summary.clone(),
    };

    let mut body = String::new();
    if let Some(main) = &images.main {
        body.push_str(&format!("![image]({})\n\n", main.url));
    }
    body.push_str(&excerpt(&content.body));
    body.push_str(&format!("\n\n{MORE_SEPARATOR}\n\n"));
    body.push_str(&place_scene(&content.body, images.scene.as_ref()));
    body.push_str("\n\n");
    body.push_str(&trailer(content, kind, details));

    RenderedDocument {
        front_matter,
        body_markdown: body,
    }
}

/// Serialize to `---` fenced YAML front matter followed by the body.
pub fn to_markdown(document: &RenderedDocument) -> Result<String, PublishError> {
    let yaml = serde_yaml_ng::to_string(&document.front_matter)
        .map_err(|e| PublishError::Serialization(e.to_string()))?;
    Ok(format!(
        "---\n{yaml}---\n\n{}\n",
        document.body_markdown.trim_end()
    ))
}

/// First sentence of the first paragraph, terminator included.
fn excerpt(body: &str) -> String {
    let text = collapse_whitespace(&body.replacen(SCENE_MARKER, "", 1));
    let paragraph = text.split("\n\n").next().unwrap_or_default();
    match paragraph.find(SENTENCE_TERMINATORS) {
        Some(idx) => paragraph[..=idx].to_string(),
        None => paragraph.to_string(),
    }
}

/// Resolve the first marker only; later markers stay as literal text.
fn place_scene(body: &str, scene: Option<&ImageReference>) -> String {
    let body = body.trim();
    let Some((before, after)) = body.split_once(SCENE_MARKER) else {
        return body.to_string();
    };

    let block_context = before.ends_with('\n') || after.starts_with('\n');
    let before = before.trim_end();
    let after = after.trim_start();

    let mut parts: Vec<String> = Vec::with_capacity(3);
    if !before.is_empty() {
        parts.push(before.to_string());
    }
    if let Some(scene) = scene {
        parts.push(format!("![scene]({})", scene.url));
    }
    if !after.is_empty() {
        parts.push(after.to_string());
    }

    let separator = if scene.is_some() || block_context {
        "\n\n"
    } else {
        " "
    };
    parts.join(separator)
}

fn trailer(content: &NormalizedContent, kind: ContentKind, details: &GenerationDetails) -> String {
    let mut out = String::from("### Generation Details\n\n");

    out.push_str(&format!("#### {} Prompt\n\n", kind.label()));
    out.push_str(&text_block(&details.prompt_summary));
    out.push_str("#### Image Prompt\n\n");
    out.push_str(&text_block(&content.image_prompt));
    out.push_str("#### Scene Prompt\n\n");
    out.push_str(&text_block(&content.scene_prompt));

    out.push_str("#### Text Generation\n\n");
    out.push_str(&format!("- Provider: {}\n", details.text_provider));
    out.push_str(&format!("- Model: {}\n", details.text_model));

    if !details.image_settings.is_empty() {
        out.push_str("\n#### Image Generation Settings\n\n");
        for (label, value) in &details.image_settings {
            out.push_str(&format!("- {label}: {value}\n"));
        }
    }
    out
}

fn text_block(text: &str) -> String {
    format!("```text\n{}\n```\n\n", text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    fn content(body: &str) -> NormalizedContent {
        NormalizedContent {
            title: "The Bouncer".to_string(),
            body: body.to_string(),
            category: "general".to_string(),
            tags: vec!["story".to_string(), "humor".to_string()],
            image_prompt: "family-friendly, safe, red ball".to_string(),
            scene_prompt: "family-friendly, safe, ball bouncing".to_string(),
            summary: None,
        }
    }

    fn details() -> GenerationDetails {
        GenerationDetails {
            prompt_summary: "Short funny story about a ball, 300-400 words.".to_string(),
            text_provider: "ollama".to_string(),
            text_model: "gemma3:12b".to_string(),
            image_settings: GenerationDetails::describe_image_settings(&ImageSettings::default()),
        }
    }

    fn images() -> ImageSet {
        ImageSet {
            main: Some(ImageReference {
                url: "/images/image-20261016093005.png".to_string(),
            }),
            scene: Some(ImageReference {
                url: "/images/scene-20261016093005.png".to_string(),
            }),
        }
    }

    #[test]
    fn test_scene_image_replaces_single_marker() {
        let doc = render_document(
            &content("A red ball rolled. [SCENE] It bounced forever."),
            ContentKind::Story,
            &images(),
            &details(),
            now(),
            false,
        );
        let body = &doc.body_markdown;
        assert_eq!(body.matches("![scene](").count(), 1);
        assert!(!body.contains(SCENE_MARKER));
        assert!(body.contains(
            "A red ball rolled.\n\n![scene](/images/scene-20261016093005.png)\n\nIt bounced forever."
        ));
    }

    #[test]
    fn test_layout_order() {
        let doc = render_document(
            &content("A red ball rolled. [SCENE] It bounced forever."),
            ContentKind::Story,
            &images(),
            &details(),
            now(),
            false,
        );
        let body = &doc.body_markdown;
        let main = body.find("![image](").unwrap();
        let excerpt = body.find("A red ball rolled.").unwrap();
        let more = body.find(MORE_SEPARATOR).unwrap();
        let scene = body.find("![scene](").unwrap();
        let trailer = body.find("### Generation Details").unwrap();
        assert!(main < excerpt && excerpt < more && more < scene && scene < trailer);
        assert!(body.starts_with("![image](/images/image-20261016093005.png)\n\nA red ball rolled.\n\n"));
    }

    #[test]
    fn test_image_failure_only_drops_image_sections() {
        let body = "A red ball rolled.\n\n[SCENE]\n\nIt bounced forever.";
        let with = render_document(
            &content(body),
            ContentKind::Story,
            &images(),
            &details(),
            now(),
            false,
        );
        let without = render_document(
            &content(body),
            ContentKind::Story,
            &ImageSet::default(),
            &details(),
            now(),
            false,
        );

        assert_eq!(with.front_matter, without.front_matter);
        assert!(!without.body_markdown.contains("!["));
        assert!(!without.body_markdown.contains(SCENE_MARKER));
        let stripped = with
            .body_markdown
            .replace("![image](/images/image-20261016093005.png)\n\n", "")
            .replace("![scene](/images/scene-20261016093005.png)\n\n", "");
        assert_eq!(stripped, without.body_markdown);
    }

    #[test]
    fn test_inline_marker_removed_without_scene() {
        let doc = render_document(
            &content("One. [SCENE] Two."),
            ContentKind::Story,
            &ImageSet::default(),
            &details(),
            now(),
            false,
        );
        assert!(doc.body_markdown.contains(&format!("{MORE_SEPARATOR}\n\nOne. Two.\n\n")));
    }

    #[test]
    fn test_only_first_marker_is_resolved() {
        let doc = render_document(
            &content("One. [SCENE] Two. [SCENE] Three."),
            ContentKind::Story,
            &images(),
            &details(),
            now(),
            false,
        );
        assert_eq!(doc.body_markdown.matches("![scene](").count(), 1);
        assert_eq!(doc.body_markdown.matches(SCENE_MARKER).count(), 1);
    }

    #[test]
    fn test_excerpt_skips_leading_marker() {
        assert_eq!(excerpt("[SCENE] Hello there. More."), "Hello there.");
        assert_eq!(excerpt("No stop\n\nSecond."), "No stop");
    }

    #[test]
    fn test_front_matter_categories() {
        let mut item = content("Body.");
        item.category = "sports".to_string();
        let doc = render_document(&item, ContentKind::Article, &ImageSet::default(), &details(), now(), true);
        assert_eq!(doc.front_matter.categories, vec!["news", "sports"]);
        assert_eq!(doc.front_matter.date, "2026-10-16");
        assert!(doc.front_matter.draft);

        let doc = render_document(&item, ContentKind::Story, &ImageSet::default(), &details(), now(), false);
        assert_eq!(doc.front_matter.categories, vec!["sports"]);
    }

    #[test]
    fn test_trailer_lists_prompts_and_settings() {
        let doc = render_document(
            &content("Body."),
            ContentKind::Story,
            &ImageSet::default(),
            &details(),
            now(),
            false,
        );
        let body = &doc.body_markdown;
        assert!(body.contains("#### Story Prompt\n\n```text\nShort funny story about a ball, 300-400 words.\n```"));
        assert!(body.contains("```text\nfamily-friendly, safe, red ball\n```"));
        assert!(body.contains("```text\nfamily-friendly, safe, ball bouncing\n```"));
        assert!(body.contains("- Provider: ollama\n- Model: gemma3:12b\n"));
        assert!(body.contains("- Resolution: 768x768\n- Steps: 30\n- CFG: 7\n- Sampler: DPM++ 2M\n"));
    }

    #[test]
    fn test_dalle_settings_description() {
        let settings = ImageSettings {
            provider: ImageProviderType::Dalle,
            ..ImageSettings::default()
        };
        let described = GenerationDetails::describe_image_settings(&settings);
        assert_eq!(described[0], ("Resolution".to_string(), "1024x1024".to_string()));
        assert_eq!(described.len(), 3);
    }

    #[test]
    fn test_to_markdown_front_matter_roundtrip() {
        let mut item = content("A red ball rolled. [SCENE] It bounced.");
        item.summary = Some("A ball rolls.".to_string());
        let doc = render_document(&item, ContentKind::Story, &images(), &details(), now(), false);
        let markdown = to_markdown(&doc).unwrap();

        assert!(markdown.starts_with("---\n"));
        let rest = &markdown[4..];
        let end = rest.find("\n---\n").unwrap();
        let parsed: FrontMatter = serde_yaml_ng::from_str(&rest[..end]).unwrap();
        assert_eq!(parsed, doc.front_matter);
        assert!(rest[end..].starts_with("\n---\n\n![image]("));
        assert!(markdown.ends_with('\n'));
    }
}
