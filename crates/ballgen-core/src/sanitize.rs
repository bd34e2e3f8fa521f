//! Content sanitizer.
//!
//! Pure, total string transforms applied to model output before it is used
//! as a file-name component, an image prompt, or document text. None of these
//! functions can fail.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use ballgen_types::content::SCENE_MARKER;

/// Default upper bound on title and slug length, in characters.
pub const TITLE_MAX_LEN: usize = 50;

/// Upper bound on image prompt length, in whitespace-separated words.
pub const IMAGE_PROMPT_MAX_WORDS: usize = 20;

/// Qualifier prepended to every image prompt.
pub const SAFETY_PREFIX: &str = "family-friendly, safe, ";

/// Terms removed from image prompts by literal substring removal.
///
/// Lowercase; prompts are lowercased before matching.
pub const DISALLOWED_TERMS: &[&str] = &[
    "violence",
    "violent",
    "harm",
    "danger",
    "damage",
    "destruction",
    "destroy",
    "kill",
    "blood",
    "weapon",
    "explosion",
    "explode",
    "attack",
    "injury",
    "injure",
    "crash",
];

pub(crate) const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid regex"));

static BRACE_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("valid regex"));

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n\s*").expect("valid regex"));

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reduce a raw title to a hyphen-joined, title-cased slug of at most
/// [`TITLE_MAX_LEN`] characters.
pub fn clean_title(raw: &str) -> String {
    clean_title_with_limit(raw, TITLE_MAX_LEN)
}

/// [`clean_title`] with an explicit length bound.
///
/// Output contains only word characters and single hyphens, never starts or
/// ends with a hyphen, and is a fixed point of itself.
pub fn clean_title_with_limit(raw: &str, max_len: usize) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| is_word_char(*c) || *c == '-' || c.is_whitespace())
        .collect();

    let joined = kept
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join("-");

    truncate_chars(&joined, max_len)
        .trim_end_matches('-')
        .to_string()
}

// ASCII-only case mapping keeps the char count stable.
fn title_case_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(token.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// Human-readable title: word characters, spaces and hyphens only,
/// whitespace-collapsed, cut on a word boundary at `max_len` characters.
/// Case is preserved.
pub fn sanitize_display_title(raw: &str, max_len: usize) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| is_word_char(*c) || *c == '-' || c.is_whitespace())
        .collect();
    let collapsed = collapse_inline(&kept);
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }

    let cut = truncate_chars(&collapsed, max_len);
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut,
    };
    cut.trim_end_matches([' ', '-']).to_string()
}

/// Make an image prompt family-safe and bounded.
///
/// Lowercases, strips structural artifacts and markers, removes every
/// [`DISALLOWED_TERMS`] entry until none remain, prefixes [`SAFETY_PREFIX`]
/// and keeps at most [`IMAGE_PROMPT_MAX_WORDS`] words including the prefix.
pub fn clean_image_prompt(raw: &str) -> String {
    let mut prompt = strip_markers(&strip_artifacts(raw)).to_lowercase();

    // Removing one term can splice another together, e.g. "kilharml".
    loop {
        let before = prompt.len();
        for term in DISALLOWED_TERMS {
            if prompt.contains(term) {
                prompt = prompt.replace(term, "");
            }
        }
        if prompt.len() == before {
            break;
        }
    }

    let prompt = collapse_inline(&prompt);
    let rest = prompt
        .strip_prefix(SAFETY_PREFIX.trim_end())
        .unwrap_or(&prompt);

    SAFETY_PREFIX
        .split_whitespace()
        .chain(rest.split_whitespace())
        .take(IMAGE_PROMPT_MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove code-fence markers and brace-delimited fragments, then any
/// unmatched braces left behind. Marker tokens are untouched.
pub fn strip_artifacts(text: &str) -> String {
    let mut out = CODE_FENCE_RE.replace_all(text, "").into_owned();

    // Inner fragments first, so nested objects unwrap one level per pass.
    while let Cow::Owned(next) = BRACE_FRAGMENT_RE.replace_all(&out, "") {
        out = next;
    }

    out.retain(|c| c != '{' && c != '}');
    out.trim().to_string()
}

/// Remove every illustration marker token.
pub fn strip_markers(text: &str) -> String {
    text.replace(SCENE_MARKER, "")
}

/// Collapse whitespace runs to single spaces within each paragraph while
/// keeping paragraph breaks as a single blank line.
pub fn collapse_whitespace(text: &str) -> String {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(collapse_inline)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collapse every whitespace run, newlines included, to a single space.
pub fn collapse_inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first paragraph up to (not including) the first sentence
/// terminator, trimmed.
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim_start();
    let paragraph = match PARAGRAPH_BREAK_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    let end = paragraph
        .find(SENTENCE_TERMINATORS)
        .unwrap_or(paragraph.len());
    paragraph[..end].trim()
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_title_title_cases_and_hyphenates() {
        assert_eq!(clean_title("the  bouncy ball's day"), "The-Bouncy-Balls-Day");
        assert_eq!(clean_title("Breaking: Golf Ball!"), "Breaking-Golf-Ball");
    }

    #[test]
    fn test_clean_title_collapses_hyphen_runs() {
        assert_eq!(clean_title("--a -- b--"), "A-B");
    }

    #[test]
    fn test_clean_title_truncates_without_trailing_hyphen() {
        let title = clean_title("aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk");
        assert!(title.chars().count() <= TITLE_MAX_LEN);
        assert!(!title.ends_with('-'));
        assert!(title.starts_with("Aaaa-Bbbb"));
    }

    #[test]
    fn test_clean_title_empty_input() {
        assert_eq!(clean_title(""), "");
        assert_eq!(clean_title("!!! ???"), "");
    }

    #[test]
    fn test_clean_title_with_small_limit() {
        assert_eq!(clean_title_with_limit("golf ball escape", 9), "Golf-Ball");
        assert_eq!(clean_title_with_limit("golf ball escape", 5), "Golf");
    }

    #[test]
    fn test_sanitize_display_title_preserves_case() {
        assert_eq!(sanitize_display_title("The Bouncer", 50), "The Bouncer");
        assert_eq!(
            sanitize_display_title("  Ping-Pong:  The {Return}!  ", 50),
            "Ping-Pong The Return"
        );
    }

    #[test]
    fn test_sanitize_display_title_cuts_on_word_boundary() {
        let title = sanitize_display_title(
            "A Remarkably Long Headline About A Medicine Ball That Refused To Move",
            30,
        );
        assert_eq!(title, "A Remarkably Long Headline");
    }

    #[test]
    fn test_clean_image_prompt_removes_terms_and_prefixes() {
        let prompt = clean_image_prompt("A Violent explosion near a BEACH BALL");
        assert_eq!(prompt, "family-friendly, safe, a near a beach ball");
    }

    #[test]
    fn test_clean_image_prompt_removes_spliced_terms() {
        let prompt = clean_image_prompt("kilharml ball");
        assert!(!prompt.contains("kill"));
        assert!(!prompt.contains("harm"));
    }

    #[test]
    fn test_clean_image_prompt_truncates_to_word_limit() {
        let raw = (1..=40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let prompt = clean_image_prompt(&raw);
        let prefix_words = SAFETY_PREFIX.split_whitespace().count();
        assert_eq!(prefix_words, 2);
        assert_eq!(prompt.split_whitespace().count(), IMAGE_PROMPT_MAX_WORDS);
        assert!(prompt.starts_with("family-friendly, safe, w1 w2"));
        assert!(prompt.ends_with(" w18"));
        assert!(!prompt.contains("w19"));
    }

    #[test]
    fn test_clean_image_prompt_does_not_double_prefix() {
        let once = clean_image_prompt("a golf ball on a green");
        assert_eq!(clean_image_prompt(&once), once);
    }

    #[test]
    fn test_clean_image_prompt_strips_artifacts_and_markers() {
        let prompt = clean_image_prompt("```json {\"x\":1} red ball [SCENE]");
        assert_eq!(prompt, "family-friendly, safe, red ball");
    }

    #[test]
    fn test_clean_image_prompt_empty_input() {
        assert_eq!(clean_image_prompt(""), "family-friendly, safe,");
    }

    #[test]
    fn test_strip_artifacts_removes_fences_and_nested_braces() {
        let text = "```json\nHello {outer {inner} more} world }\n```";
        assert_eq!(strip_artifacts(text), "Hello  world");
    }

    #[test]
    fn test_strip_artifacts_keeps_markers() {
        assert_eq!(strip_artifacts("a [SCENE] b"), "a [SCENE] b");
    }

    #[test]
    fn test_collapse_whitespace_keeps_paragraphs() {
        let text = "  one   two\nthree \n\n\n  four\t five  ";
        assert_eq!(collapse_whitespace(text), "one two three\n\nfour five");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Hello there. Second one."), "Hello there");
        assert_eq!(first_sentence("No terminator here"), "No terminator here");
        assert_eq!(first_sentence("Para one\n\nPara two."), "Para one");
        assert_eq!(first_sentence("Wow! Big news?"), "Wow");
        assert_eq!(first_sentence(""), "");
    }

    proptest! {
        #[test]
        fn prop_clean_title_is_idempotent(raw in "\\PC{0,120}") {
            let once = clean_title(&raw);
            prop_assert_eq!(clean_title(&once), once);
        }

        #[test]
        fn prop_clean_title_charset_and_length(raw in "\\PC{0,120}", max in 1usize..80) {
            let title = clean_title_with_limit(&raw, max);
            prop_assert!(title.chars().count() <= max);
            prop_assert!(title.chars().all(|c| is_word_char(c) || c == '-'));
            prop_assert!(!title.contains("--"));
        }

        #[test]
        fn prop_clean_image_prompt_is_safe_and_bounded(
            words in prop::collection::vec(
                prop_oneof![
                    "[a-z]{1,8}",
                    prop::sample::select(DISALLOWED_TERMS.to_vec()).prop_map(str::to_string),
                    "[A-Z{}`]{1,4}",
                ],
                0..40,
            ),
            glue in prop::sample::select(vec![" ", "", "\n"]),
        ) {
            let prompt = clean_image_prompt(&words.join(glue));
            for term in DISALLOWED_TERMS {
                prop_assert!(!prompt.contains(term), "{} found in {}", term, prompt);
            }
            prop_assert!(prompt.split_whitespace().count() <= IMAGE_PROMPT_MAX_WORDS);
            prop_assert!(prompt.starts_with("family-friendly, safe,"));
        }
    }
}
