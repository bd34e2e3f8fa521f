//! Content model: what is requested, what the normalizer produces, and what
//! the renderer hands to the publisher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved token marking where the scene illustration goes in a body.
pub const SCENE_MARKER: &str = "[SCENE]";

/// Kind of content to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Story,
    Article,
}

impl ContentKind {
    /// Capitalized label used in templated defaults ("Story about a ...").
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Story => "Story",
            ContentKind::Article => "Article",
        }
    }

    /// JSON key the model is asked to put the body under.
    pub fn body_key(&self) -> &'static str {
        match self {
            ContentKind::Story => "story",
            ContentKind::Article => "article",
        }
    }

    /// Body key of the other kind, accepted as a last resort.
    pub fn other_body_key(&self) -> &'static str {
        match self {
            ContentKind::Story => "article",
            ContentKind::Article => "story",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Story => write!(f, "story"),
            ContentKind::Article => write!(f, "article"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "story" => Ok(ContentKind::Story),
            "article" | "news" => Ok(ContentKind::Article),
            other => Err(format!("invalid content kind: '{other}'")),
        }
    }
}

/// A single generation request. Created per invocation, discarded after use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    /// What the content is about (a ball type, e.g. "golf ball").
    pub topic: String,
    pub kind: ContentKind,
    /// Requested category; articles pick one at random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ContentRequest {
    pub fn new(kind: ContentKind, topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            kind,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A fully populated, schema-conforming record built from a model response.
///
/// Every field is present and non-empty once normalization completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContent {
    /// Display title: word characters, spaces and hyphens only.
    pub title: String,
    /// Body text holding at least one [`SCENE_MARKER`]; only the first is live.
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_prompt: String,
    pub scene_prompt: String,
    /// Optional short summary (stories ask for a 3-line one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NormalizedContent {
    /// Append a tag unless an equal one (case-insensitive) is already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            self.tags.push(tag.to_string());
        }
    }
}

/// Which step of the normalization ladder produced the candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// The whole response parsed as a JSON object.
    StrictJson,
    /// A JSON object was found inside a fenced code block.
    FencedJson,
    /// No usable JSON; the text itself became the body.
    FreeText,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::StrictJson => write!(f, "strict_json"),
            ResponseSource::FencedJson => write!(f, "fenced_json"),
            ResponseSource::FreeText => write!(f, "free_text"),
        }
    }
}

/// A stored illustration, as referenced from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Site-relative URL, e.g. `/images/scene-20261016101500.png`.
    pub url: String,
}

/// Zero, one or two illustrations attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub main: Option<ImageReference>,
    pub scene: Option<ImageReference>,
}

impl ImageSet {
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.scene.is_none()
    }
}

/// Front matter header consumed by the static-site generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    pub draft: bool,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Front matter plus markdown body, ready to be serialized to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub front_matter: FrontMatter,
    pub body_markdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_roundtrip() {
        for kind in [ContentKind::Story, ContentKind::Article] {
            let parsed: ContentKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_content_kind_news_alias() {
        assert_eq!("News".parse::<ContentKind>().unwrap(), ContentKind::Article);
        assert!("poem".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_add_tag_skips_duplicates_and_blanks() {
        let mut content = NormalizedContent {
            title: "t".into(),
            body: "b".into(),
            category: "c".into(),
            tags: vec!["story".into(), "Ollama".into()],
            image_prompt: "i".into(),
            scene_prompt: "s".into(),
            summary: None,
        };
        content.add_tag("ollama");
        content.add_tag("  ");
        content.add_tag("openai");
        assert_eq!(content.tags, vec!["story", "Ollama", "openai"]);
    }

    #[test]
    fn test_response_source_serde() {
        let json = serde_json::to_string(&ResponseSource::FencedJson).unwrap();
        assert_eq!(json, "\"fenced_json\"");
    }

    #[test]
    fn test_image_set_is_empty() {
        let mut set = ImageSet::default();
        assert!(set.is_empty());
        set.scene = Some(ImageReference {
            url: "/images/scene.png".into(),
        });
        assert!(!set.is_empty());
    }
}
