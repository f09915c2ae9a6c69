//! Raw generated text → article draft.
//!
//! Everything here is a pure function of its inputs so it can be tested
//! apart from randomness and I/O.

use crate::db::ArticleDraft;

/// Maximum number of content characters carried into an excerpt.
pub const EXCERPT_CHARS: usize = 200;

/// Marker appended to every excerpt.
pub const ELLIPSIS: &str = "...";

const SENTENCES_PER_PARAGRAPH: usize = 3;

/// Build an article draft from generated text and the prompt that produced it.
///
/// Text without any line breaks is re-segmented into paragraphs of three
/// sentences each.
pub fn format_article(raw: &str, prompt: &str) -> ArticleDraft {
    let cleaned = raw.trim();

    let content = if cleaned.contains('\n') {
        cleaned.to_string()
    } else {
        paragraphs_from_sentences(cleaned)
    };

    ArticleDraft {
        title: title_from_prompt(prompt),
        excerpt: make_excerpt(&content),
        content,
    }
}

/// Capitalize the first character of every whitespace-delimited word.
pub fn title_from_prompt(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First [`EXCERPT_CHARS`] characters with line breaks flattened, plus [`ELLIPSIS`].
pub fn make_excerpt(content: &str) -> String {
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    let flattened = head
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    format!("{}{}", flattened.trim(), ELLIPSIS)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn paragraphs_from_sentences(text: &str) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return text.to_string();
    }

    sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| format!("{}.", group.join(". ")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split on runs of `.`, `!` and `?`, dropping the terminators and any
/// fragment left empty after trimming.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
