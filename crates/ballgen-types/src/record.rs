//! Typed shapes of the JSON records the model is asked to return.
//!
//! These are never used to parse responses (the normalizer works on loose
//! `serde_json::Value`s because models drift from the contract); they exist
//! to derive the JSON schema sent to the backend as the format hint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::content::ContentKind;

/// Record requested for [`ContentKind::Story`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryRecord {
    /// A creative, engaging title for the story.
    pub title: String,
    /// The full story text with a [SCENE] marker where an illustration fits.
    pub story: String,
    /// A 3-line summary of the story.
    pub summary: String,
    /// Prompt for an illustration of the story's key scene.
    pub image_prompt: String,
    /// Prompt for an illustration of the scene marked with [SCENE].
    pub scene_prompt: String,
}

/// Record requested for [`ContentKind::Article`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleRecord {
    /// A catchy, news-style headline.
    pub title: String,
    /// The news category.
    pub category: String,
    /// The full article text with a [SCENE] marker where an illustration fits.
    pub article: String,
    /// Prompt for an illustration of the article's key scene.
    pub image_prompt: String,
    /// Prompt for an illustration of the scene marked with [SCENE].
    pub scene_prompt: String,
    /// Keyword tags.
    pub tags: Vec<String>,
}

/// JSON schema of the record expected for `kind`.
pub fn record_schema(kind: ContentKind) -> serde_json::Value {
    match kind {
        ContentKind::Story => schemars::schema_for!(StoryRecord).to_value(),
        ContentKind::Article => schemars::schema_for!(ArticleRecord).to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_schema_lists_story_fields() {
        let schema = record_schema(ContentKind::Story);
        let props = schema["properties"].as_object().unwrap();
        for key in ["title", "story", "summary", "image_prompt", "scene_prompt"] {
            assert!(props.contains_key(key), "missing {key}");
        }
        assert!(!props.contains_key("article"));
    }

    #[test]
    fn test_article_schema_lists_article_fields() {
        let schema = record_schema(ContentKind::Article);
        let props = schema["properties"].as_object().unwrap();
        for key in ["title", "category", "article", "tags"] {
            assert!(props.contains_key(key), "missing {key}");
        }
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "article"));
    }
}
