//! Text and number normalization shared by reference loading and row classification.
//!
//! Everything that is compared (keywords, city names, hotel names) goes through
//! [`normalize_text`] on both sides, so matching is case- and accent-insensitive.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Case-fold, strip diacritics, expand ligatures and collapse whitespace.
///
/// Stable under repeated application: `normalize_text(normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match ch {
            'œ' => out.push_str("oe"),
            'æ' => out.push_str("ae"),
            'ß' => out.push_str("ss"),
            '\u{2019}' | '\u{2018}' | '`' => out.push('\''),
            _ => out.push(ch),
        }
    }

    out
}

/// Keep ASCII digits only ("75 001" -> "75001", "F-06000" -> "06000").
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a spreadsheet-ish number: trims, accepts a decimal comma, ignores inner spaces.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a count (rooms, capacity). Fractions truncate toward zero.
pub fn parse_count(raw: &str) -> Option<i64> {
    parse_number(raw).map(|n| n.trunc() as i64)
}

/// Ordered, de-duplicated list of normalized keywords.
///
/// Deserializes from a plain list of strings and normalizes at load time so each
/// row only pays for one normalization of the field being tested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = Vec::new();
        for kw in raw {
            let kw = normalize_text(kw.as_ref());
            if !kw.is_empty() && !keywords.contains(&kw) {
                keywords.push(kw);
            }
        }
        Self { keywords }
    }

    /// First keyword contained in `normalized` (which must already be normalized).
    pub fn find_in(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|kw| normalized.contains(kw.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.find_in(normalized).is_some()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(raw: Vec<String>) -> Self {
        Self::new(raw)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}
