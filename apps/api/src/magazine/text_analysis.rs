//! Text Analysis — year hints, keyword sets, pull quotes, and name emphasis.
//!
//! Pure functions over `&str`. No allocation beyond the returned values, no I/O.
//! Lengths are measured in characters, never bytes.

use std::cmp::Reverse;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::models::chapter::Chapter;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{4,}\b").unwrap());
/// A sentence body followed by its (possibly empty) run of terminators.
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());
static FULL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+ [A-Z][a-z]+)\b").unwrap());

/// Default window for keyword extraction, in characters.
pub const KEYWORD_WINDOW: usize = 500;
/// Default upper bound (exclusive) on pull-quote length.
pub const DEFAULT_PULL_QUOTE_MAX: usize = 150;

const EMOTIONAL_MIN_LEN: usize = 30;
const FALLBACK_MIN_LEN: usize = 40;
const EMOTIONAL_KEYWORDS: [&str; 5] = ["love", "remember", "never", "always", "first"];
const QUOTE_CHARS: [char; 7] = ['"', '\'', '!', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

const NAMES_PER_CHAPTER: usize = 2;
const MAX_INFERRED_NAMES: usize = 5;

pub const EMPHASIS_OPEN: &str = r#"<span class="highlight-name">"#;
pub const EMPHASIS_CLOSE: &str = "</span>";

// ────────────────────────────────────────────────────────────────────────────
// Year and keywords
// ────────────────────────────────────────────────────────────────────────────

/// Returns the first run of four ASCII digits in the title, e.g. `"Early Years (1950-1960)"` → 1950.
pub fn extract_year(title: &str) -> Option<i32> {
    YEAR_RE
        .find(title)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Lower-cased word tokens of 4+ characters from the first `limit` characters of `text`.
pub fn extract_keywords(text: &str, limit: usize) -> HashSet<String> {
    let window: String = text.to_lowercase().chars().take(limit).collect();
    WORD_RE
        .find_iter(&window)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Pull quotes
// ────────────────────────────────────────────────────────────────────────────

/// Picks a pull-quote sentence.
///
/// Pass 1: first sentence with length in (30, max) that carries a quote mark,
/// an exclamation mark, or an emotional keyword. Pass 2: first sentence with
/// length in (40, max). Length counts the sentence body only, without its run
/// of terminators. The returned text keeps the terminators except trailing
/// periods and ends in exactly one appended period.
pub fn extract_pull_quote(text: &str, max_length: usize) -> Option<String> {
    let sentences: Vec<&str> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    sentences
        .iter()
        .find(|s| body_length_within(s, EMOTIONAL_MIN_LEN, max_length) && is_emotional(s))
        .or_else(|| {
            sentences
                .iter()
                .find(|s| body_length_within(s, FALLBACK_MIN_LEN, max_length))
        })
        .map(|s| format!("{}.", s.trim_end_matches('.')))
}

fn body_length_within(sentence: &str, min_exclusive: usize, max_exclusive: usize) -> bool {
    let len = sentence
        .trim_end_matches(['.', '!', '?'])
        .trim_end()
        .chars()
        .count();
    min_exclusive < len && len < max_exclusive
}

fn is_emotional(sentence: &str) -> bool {
    if sentence.contains(QUOTE_CHARS) {
        return true;
    }
    let lower = sentence.to_lowercase();
    EMOTIONAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

// ────────────────────────────────────────────────────────────────────────────
// Names
// ────────────────────────────────────────────────────────────────────────────

/// Wraps every case-insensitive, word-bounded occurrence of a configured name in
/// emphasis markup.
///
/// Single pass over the text with the longest names tried first, so
/// "Mary Smith" wins over "Mary" and no span is ever wrapped twice.
/// `names` must already be escaped the same way as `text`.
pub fn highlight_names(text: &str, names: &[String]) -> String {
    let alternatives = name_alternatives(names);
    if alternatives.is_empty() {
        return text.to_string();
    }

    let pattern = format!(
        r"\b(?:{})\b",
        alternatives
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|")
    );

    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            warn!("Name emphasis disabled, pattern rejected: {e}");
            return text.to_string();
        }
    };

    re.replace_all(text, format!("{EMPHASIS_OPEN}$0{EMPHASIS_CLOSE}").as_str())
        .into_owned()
}

/// Trimmed, non-empty names, longest first, one entry per case-insensitive spelling.
fn name_alternatives(names: &[String]) -> Vec<&str> {
    let mut alternatives: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    alternatives.sort_by_cached_key(|n| (Reverse(n.chars().count()), n.to_lowercase()));
    alternatives.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());
    alternatives
}

/// Infers family names when none are configured: the first two `Firstname Lastname`
/// pairs of every chapter, de-duplicated in first-seen order, at most five overall.
pub fn infer_family_names(chapters: &[Chapter]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for chapter in chapters {
        let text = chapter.combined_text();
        for m in FULL_NAME_RE.find_iter(&text).take(NAMES_PER_CHAPTER) {
            let name = m.as_str().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names.truncate(MAX_INFERRED_NAMES);
    names
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
