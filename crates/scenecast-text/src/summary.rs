//! Short summaries of scene text.

use std::collections::HashSet;

use crate::{
    extractor::vocabulary::{capitalize, is_stopword, singular},
    lexer,
};

/// Title used when a scene has no significant words.
pub const UNTITLED: &str = "Untitled scene";

/// Number of significant words in a scene title.
pub const TITLE_WORDS: usize = 4;

/// The significant words of `text` in order of first appearance.
///
/// Stopwords and words shorter than three characters are skipped; plurals
/// and case variants of a word already seen are dropped.
pub fn significant_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    lexer::tokenize(text)
        .iter()
        .filter(|token| token.is_word() || token.is_number())
        .filter_map(|token| {
            let lower = token.lower();
            if lower.chars().count() < 3 || is_stopword(&lower) {
                return None;
            }
            seen.insert(singular(&lower)).then_some(lower)
        })
        .collect()
}

/// A short title for `text`, or [`UNTITLED`].
///
/// # Examples
///
/// ```
/// # use scenecast_text::summary::title;
/// assert_eq!(title("So the CEO oversees the VPs."), "Ceo oversees vps");
/// assert_eq!(title("and so on"), "Untitled scene");
/// ```
pub fn title(text: &str) -> String {
    let words = significant_words(text);
    if words.is_empty() {
        return UNTITLED.to_string();
    }
    let joined = words
        .into_iter()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    capitalize(&joined)
}
