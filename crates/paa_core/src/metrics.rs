use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Average reading speed, words per minute.
pub const WORDS_PER_MINUTE: usize = 225;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("tag pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetrics {
    pub word_count: usize,
    pub reading_time: usize,
}

/// Approximates the visible text of `html` and counts it.
///
/// Every `<...>` span becomes a single space, the rest is split on whitespace.
/// Reading time is the word count over 225, rounded up.
pub fn derive_metrics(html: &str) -> ArticleMetrics {
    let text = TAG.replace_all(html, " ");
    let word_count = text.split_whitespace().count();
    ArticleMetrics {
        word_count,
        reading_time: word_count.div_ceil(WORDS_PER_MINUTE),
    }
}
