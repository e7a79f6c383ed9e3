//! Text primitives: folding, tokenization and hashtag extraction.
//!
//! Folding = lowercase + NFKD + drop combining marks, so `Ótimo`, `otimo`
//! and `ÓTIMO` all land on the same lexicon key.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

// Hashtags (optionally hyphenated) first, then plain words. Unicode-aware.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)#\w+(?:-\w+)*|\b\w+\b").expect("tokenizer regex"));

/// Lowercase and strip diacritics.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Split text into word and hashtag tokens, preserving original case.
pub fn tokenize(s: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(s).map(|m| m.as_str()).collect()
}

/// Hashtags found in `content`, case-preserved, deduplicated in first-seen order.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in tokenize(content) {
        if tok.starts_with('#') && !out.iter().any(|t| t == tok) {
            out.push(tok.to_string());
        }
    }
    out
}

/// Case- and accent-insensitive substring check.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Length in Unicode scalar values (what a user would count as characters).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
