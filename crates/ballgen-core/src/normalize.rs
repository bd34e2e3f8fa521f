//! Response normalizer.
//!
//! Turns an untrusted model response into a complete [`NormalizedContent`].
//! Candidates come from the first ladder step that succeeds:
//!
//! 1. strict parse of the whole response as a JSON object
//! 2. a fenced ```` ```json ```` block containing an object
//! 3. free text, with title and prompts derived from the first sentence
//!
//! Validation then fills every missing field with a default built from the
//! request, so normalization has no error path.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::{Map, Value};

use ballgen_types::content::{
    ContentKind, ContentRequest, NormalizedContent, ResponseSource, SCENE_MARKER,
};

use crate::catalog::{DEFAULT_STORY_CATEGORY, random_news_category};
use crate::sanitize::{
    SENTENCE_TERMINATORS, TITLE_MAX_LEN, clean_image_prompt, clean_title_with_limit,
    collapse_inline, collapse_whitespace, first_sentence, sanitize_display_title,
    strip_artifacts, strip_markers,
};

static FENCED_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("valid regex"));

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*\**summary\**\s*:").expect("valid regex"));

/// Result of a normalization: the record plus the ladder step that produced
/// its candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOutcome {
    pub content: NormalizedContent,
    pub source: ResponseSource,
}

/// Fields pulled out of a response before validation. Any may be missing.
#[derive(Debug, Default)]
struct Candidate {
    title: Option<String>,
    body: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    image_prompt: Option<String>,
    scene_prompt: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    title_max_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(TITLE_MAX_LEN)
    }
}

impl Normalizer {
    pub fn new(title_max_len: usize) -> Self {
        Self {
            title_max_len: title_max_len.max(1),
        }
    }

    /// Normalize using the thread-local RNG for random category picks.
    pub fn normalize(&self, raw: &str, request: &ContentRequest) -> NormalizeOutcome {
        self.normalize_with_rng(raw, request, &mut rand::thread_rng())
    }

    #[tracing::instrument(name = "normalize", skip_all, fields(kind = %request.kind, raw_len = raw.len()))]
    pub fn normalize_with_rng<R: Rng + ?Sized>(
        &self,
        raw: &str,
        request: &ContentRequest,
        rng: &mut R,
    ) -> NormalizeOutcome {
        let (candidate, source) = match extract_object(raw) {
            Some((map, source)) => (Candidate::from_object(&map, request.kind), source),
            None => (
                self.candidate_from_free_text(raw, request.kind),
                ResponseSource::FreeText,
            ),
        };
        tracing::debug!(%source, "candidate extracted");

        NormalizeOutcome {
            content: self.validate(candidate, request, rng),
            source,
        }
    }

    fn candidate_from_free_text(&self, raw: &str, kind: ContentKind) -> Candidate {
        let (body_text, summary) = split_summary(raw);
        let body = collapse_whitespace(&strip_markers(&strip_artifacts(body_text)));
        let first = first_sentence(&body).to_string();

        let (title, prompt) = if first.is_empty() {
            (None, None)
        } else {
            let lead = match kind {
                ContentKind::Article => "Breaking: ",
                ContentKind::Story => "The ",
            };
            let slug = clean_title_with_limit(&format!("{lead}{first}"), self.title_max_len);
            (
                Some(slug.replace('-', " ")),
                Some(format!("illustration of {first}")),
            )
        };

        Candidate {
            title,
            body: Some(body),
            category: None,
            tags: None,
            image_prompt: prompt.clone(),
            scene_prompt: prompt,
            summary: summary.map(|s| collapse_inline(&strip_artifacts(s))),
        }
    }

    fn validate<R: Rng + ?Sized>(
        &self,
        candidate: Candidate,
        request: &ContentRequest,
        rng: &mut R,
    ) -> NormalizedContent {
        let kind = request.kind;
        let topic = match request.topic.trim() {
            "" => "ball",
            topic => topic,
        };

        let title = candidate
            .title
            .map(|t| sanitize_display_title(&strip_artifacts(&t), self.title_max_len))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.default_title(kind, topic));

        let body = clean_field(candidate.body)
            .unwrap_or_else(|| format!("{} about a {topic}.", kind.label()));
        let body = ensure_marker(&body);

        let category = clean_field(candidate.category)
            .or_else(|| clean_field(request.category.clone()))
            .unwrap_or_else(|| match kind {
                ContentKind::Article => random_news_category(rng).to_string(),
                ContentKind::Story => DEFAULT_STORY_CATEGORY.to_string(),
            });

        let tags = candidate
            .tags
            .map(|tags| dedup_tags(tags.iter().map(|t| collapse_inline(&strip_artifacts(t)))))
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| default_tags(kind, topic, &category));

        let image_prompt = clean_field(candidate.image_prompt)
            .unwrap_or_else(|| default_image_prompt(kind, topic));
        let scene_prompt = clean_field(candidate.scene_prompt)
            .unwrap_or_else(|| default_scene_prompt(kind, topic));

        NormalizedContent {
            title,
            body,
            category,
            tags,
            image_prompt: clean_image_prompt(&image_prompt),
            scene_prompt: clean_image_prompt(&scene_prompt),
            summary: clean_field(candidate.summary),
        }
    }

    fn default_title(&self, kind: ContentKind, topic: &str) -> String {
        let topic = title_case_words(topic);
        let raw = match kind {
            ContentKind::Story => format!("The Great {topic} Adventure"),
            ContentKind::Article => format!("Breaking: {topic} Makes Headlines"),
        };
        let title = sanitize_display_title(&raw, self.title_max_len);
        if title.is_empty() {
            kind.label().to_string()
        } else {
            title
        }
    }
}

/// Convenience wrapper around [`Normalizer::normalize`] with default bounds.
pub fn normalize(raw: &str, request: &ContentRequest) -> NormalizeOutcome {
    Normalizer::default().normalize(raw, request)
}

/// Strict parse first, then the first fenced block that holds an object.
fn extract_object(raw: &str) -> Option<(Map<String, Value>, ResponseSource)> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw.trim()) {
        return Some((map, ResponseSource::StrictJson));
    }
    FENCED_OBJECT_RE.captures_iter(raw).find_map(|caps| {
        match serde_json::from_str::<Value>(&caps[1]) {
            Ok(Value::Object(map)) => Some((map, ResponseSource::FencedJson)),
            _ => None,
        }
    })
}

impl Candidate {
    fn from_object(map: &Map<String, Value>, kind: ContentKind) -> Self {
        let body = [kind.body_key(), "body", "content", "text", kind.other_body_key()]
            .into_iter()
            .find_map(|key| scalar_field(map, key).filter(|s| !s.trim().is_empty()));

        Self {
            title: scalar_field(map, "title"),
            body,
            category: scalar_field(map, "category"),
            tags: map.get("tags").and_then(tag_list),
            image_prompt: scalar_field(map, "image_prompt"),
            scene_prompt: scalar_field(map, "scene_prompt"),
            summary: scalar_field(map, "summary"),
        }
    }
}

/// Strings as-is, numbers and booleans stringified, everything else absent.
fn scalar_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tag_list(value: &Value) -> Option<Vec<String>> {
    let tags: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => return None,
    };
    Some(tags)
}

fn dedup_tags(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            out.push(tag);
        }
    }
    out
}

fn clean_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| strip_artifacts(&v))
        .filter(|v| !v.is_empty())
}

fn split_summary(raw: &str) -> (&str, Option<&str>) {
    match SUMMARY_RE.find(raw) {
        Some(m) => (&raw[..m.start()], Some(&raw[m.end()..])),
        None => (raw, None),
    }
}

/// Guarantee at least one marker: after the first paragraph break, else
/// after the first sentence followed by more text, else at the end.
/// Bodies that already hold one or more markers are returned unchanged.
pub fn ensure_marker(body: &str) -> String {
    if body.contains(SCENE_MARKER) {
        return body.to_string();
    }

    if let Some(idx) = body.find("\n\n") {
        let (head, tail) = body.split_at(idx);
        return format!(
            "{}\n\n{SCENE_MARKER}\n\n{}",
            head.trim_end(),
            tail.trim_start()
        );
    }

    if let Some(end) = sentence_break(body) {
        let (head, tail) = body.split_at(end);
        return format!("{} {SCENE_MARKER} {}", head.trim_end(), tail.trim_start());
    }

    format!("{}\n\n{SCENE_MARKER}", body.trim_end())
}

/// Byte offset just past the first sentence terminator that is followed by
/// whitespace and more text.
fn sentence_break(text: &str) -> Option<usize> {
    text.char_indices().find_map(|(idx, c)| {
        if !SENTENCE_TERMINATORS.contains(&c) {
            return None;
        }
        let end = idx + c.len_utf8();
        let rest = &text[end..];
        let followed_by_space = rest.starts_with(char::is_whitespace);
        (followed_by_space && !rest.trim().is_empty()).then_some(end)
    })
}

fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn topic_tag(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn default_tags(kind: ContentKind, topic: &str, category: &str) -> Vec<String> {
    let tags = match kind {
        ContentKind::Story => ["story", "humor", "fiction"].map(str::to_string),
        ContentKind::Article => ["news", "satire", "parody"].map(str::to_string),
    };
    let last = match kind {
        ContentKind::Story => topic_tag(topic),
        ContentKind::Article => category.to_string(),
    };
    dedup_tags(tags.into_iter().chain(std::iter::once(last)))
}

fn default_image_prompt(kind: ContentKind, topic: &str) -> String {
    match kind {
        ContentKind::Story => format!("funny realistic illustration of a {topic}"),
        ContentKind::Article => format!("news photo illustration of a {topic}"),
    }
}

fn default_scene_prompt(kind: ContentKind, topic: &str) -> String {
    match kind {
        ContentKind::Story => format!("funny illustration of a {topic} in the middle of its adventure"),
        ContentKind::Article => format!("news scene illustration of a {topic} at the center of events"),
    }
}
