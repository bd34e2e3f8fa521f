//! Content request builder: turns a [`ContentRequest`] into the prompt sent
//! to the text backend.

use ballgen_types::config::{ContentSettings, TextSettings};
use ballgen_types::content::{ContentKind, ContentRequest, SCENE_MARKER};
use ballgen_types::llm::{CompletionRequest, ResponseFormat};
use ballgen_types::record::record_schema;

/// System persona for chat-style backends.
pub const SYSTEM_PERSONA: &str = "You are a creative writer who specializes in humorous \
stories and satirical news articles about balls.";

/// A ready-to-send request plus a one-line description for the document
/// trailer.
#[derive(Debug, Clone)]
pub struct GenerationPrompt {
    pub request: CompletionRequest,
    pub summary: String,
}

pub fn build_prompt(
    request: &ContentRequest,
    content: &ContentSettings,
    text: &TextSettings,
) -> GenerationPrompt {
    let prompt = match request.kind {
        ContentKind::Story => story_prompt(request, content),
        ContentKind::Article => article_prompt(request, content),
    };

    GenerationPrompt {
        request: CompletionRequest {
            model: text.model().to_string(),
            system: Some(SYSTEM_PERSONA.to_string()),
            prompt,
            max_tokens: text.max_tokens,
            temperature: text.temperature,
            format: ResponseFormat::JsonSchema(record_schema(request.kind)),
        },
        summary: prompt_summary(request, content),
    }
}

/// e.g. "Humorous fake news article about a golf ball (sports), 300-400 words."
pub fn prompt_summary(request: &ContentRequest, content: &ContentSettings) -> String {
    let (min, max) = word_bounds(content);
    match (request.kind, request.category.as_deref()) {
        (ContentKind::Article, Some(category)) => format!(
            "Humorous fake news article about a {} ({category}), {min}-{max} words.",
            request.topic
        ),
        (ContentKind::Article, None) => format!(
            "Humorous fake news article about a {}, {min}-{max} words.",
            request.topic
        ),
        (ContentKind::Story, _) => format!(
            "Short funny story about a {}, {min}-{max} words.",
            request.topic
        ),
    }
}

fn word_bounds(content: &ContentSettings) -> (u32, u32) {
    let min = content.min_words.min(content.max_words);
    (min, content.max_words.max(min))
}

fn story_prompt(request: &ContentRequest, content: &ContentSettings) -> String {
    let topic = &request.topic;
    let (min, max) = word_bounds(content);
    let mut prompt = format!(
        "Write a short, funny story about a {topic}.\n\
         The story should be {min}-{max} words long, suitable for a blog post, \
         humorous and family-friendly.\n\
         \nGuidelines:\n\
         - Open with a concrete action involving the {topic} (\"The {topic} was bouncing \
         through the empty gymnasium\", \"A {topic} rolled down the driveway\").\n\
         - Give it a specific setting and an unusual problem to solve.\n\
         - Avoid generic titles such as \"The Great Ball Rebellion\".\n\
         - Put exactly one {SCENE_MARKER} marker in the story where an illustration fits best.\n\
         - Give a three-line summary of the story in the summary field.\n"
    );

    push_output_contract(
        &mut prompt,
        r#"{
  "title": "A specific title reflecting the story's action",
  "story": "The full story text with one [SCENE] marker",
  "summary": "Three short lines summarizing the story",
  "image_prompt": "A detailed description of the story's key scene for an illustration",
  "scene_prompt": "A detailed description of the moment marked with [SCENE]"
}"#,
    );
    prompt
}

fn article_prompt(request: &ContentRequest, content: &ContentSettings) -> String {
    let topic = &request.topic;
    let (min, max) = word_bounds(content);
    let category = request.category.as_deref().unwrap_or("breaking news");
    let mut prompt = format!(
        "Write a humorous fake news article about a {topic} in the {category} category.\n\
         The article should be {min}-{max} words long and follow a typical news structure: \
         a catchy headline, a lead paragraph, quotes from \"experts\" or \"witnesses\", \
         absurd but entertaining details and an unexpected conclusion.\n\
         \nGuidelines:\n\
         - Sound like a real news report while the content stays absurd.\n\
         - Invent specific places, dates and \"facts\".\n\
         - Keep it entertaining, family-friendly and never offensive.\n\
         - Put exactly one {SCENE_MARKER} marker in the article where an illustration fits best.\n"
    );

    let shape = format!(
        r#"{{
  "title": "A catchy, news-style headline",
  "category": "{category}",
  "article": "The full article text with one [SCENE] marker",
  "image_prompt": "A detailed description of the article's key scene for an illustration",
  "scene_prompt": "A detailed description of the moment marked with [SCENE]",
  "tags": ["news", "satire", "parody", "{category}"]
}}"#
    );
    push_output_contract(&mut prompt, &shape);
    prompt
}

fn push_output_contract(prompt: &mut String, shape: &str) {
    prompt.push_str("\nReturn ONLY a valid JSON object with this structure:\n");
    prompt.push_str(shape);
    prompt.push_str(
        "\n\nDo not include any other text, markdown formatting or code blocks. \
         Return ONLY the JSON object.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_prompt_contents() {
        let request = ContentRequest::new(ContentKind::Story, "golf ball");
        let built = build_prompt(&request, &ContentSettings::default(), &TextSettings::default());

        let prompt = &built.request.prompt;
        assert!(prompt.contains("golf ball"));
        assert!(prompt.contains("300-400 words"));
        assert!(prompt.contains("[SCENE]"));
        assert!(prompt.contains("\"story\""));
        assert!(prompt.contains("Return ONLY the JSON object"));
        assert_eq!(built.request.model, "gemma3:12b");
        assert_eq!(built.request.system.as_deref(), Some(SYSTEM_PERSONA));
        assert_eq!(built.request.max_tokens, 1024);
    }

    #[test]
    fn test_prompt_lines_are_newline_separated() {
        let request = ContentRequest::new(ContentKind::Story, "golf ball");
        let prompt = story_prompt(&request, &ContentSettings::default());
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(lines[0], "Write a short, funny story about a golf ball.");
        assert!(lines[1].starts_with("The story should be 300-400 words long, suitable"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Guidelines:");
        assert!(lines[4].starts_with("- Open with a concrete action involving the golf ball"));
        assert!(lines.contains(&"- Give a three-line summary of the story in the summary field."));
        let guidelines = prompt.split("\nReturn ONLY").next().unwrap();
        assert!(!guidelines.contains("  "), "continuation whitespace leaked: {guidelines:?}");

        let request =
            ContentRequest::new(ContentKind::Article, "hockey puck").with_category("science");
        let prompt = article_prompt(&request, &ContentSettings::default());
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(
            lines[0],
            "Write a humorous fake news article about a hockey puck in the science category."
        );
        assert_eq!(lines[3], "Guidelines:");
        assert_eq!(
            lines[7],
            "- Put exactly one [SCENE] marker in the article where an illustration fits best."
        );
    }

    #[test]
    fn test_article_prompt_uses_category() {
        let request =
            ContentRequest::new(ContentKind::Article, "hockey puck").with_category("science");
        let built = build_prompt(&request, &ContentSettings::default(), &TextSettings::default());

        assert!(built.request.prompt.contains("in the science category"));
        assert!(built.request.prompt.contains("\"article\""));
        assert!(built.request.prompt.contains("\"experts\""));
        assert_eq!(
            built.summary,
            "Humorous fake news article about a hockey puck (science), 300-400 words."
        );
    }

    #[test]
    fn test_format_hint_is_record_schema() {
        let request = ContentRequest::new(ContentKind::Article, "ball");
        let built = build_prompt(&request, &ContentSettings::default(), &TextSettings::default());
        match built.request.format {
            ResponseFormat::JsonSchema(schema) => {
                assert!(schema["properties"].get("article").is_some());
            }
            other => panic!("unexpected format: {other:?}"),
        }
    }

    #[test]
    fn test_word_bounds_follow_settings() {
        let content = ContentSettings {
            min_words: 500,
            max_words: 200,
            ..ContentSettings::default()
        };
        let request = ContentRequest::new(ContentKind::Story, "beach ball");
        assert_eq!(
            prompt_summary(&request, &content),
            "Short funny story about a beach ball, 200-200 words."
        );
    }

    #[test]
    fn test_model_follows_selected_backend() {
        let text = TextSettings {
            provider: ballgen_types::llm::TextProviderType::OpenAi,
            ..TextSettings::default()
        };
        let request = ContentRequest::new(ContentKind::Story, "ball");
        let built = build_prompt(&request, &ContentSettings::default(), &text);
        assert_eq!(built.request.model, "gpt-3.5-turbo");
    }
}
