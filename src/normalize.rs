//! Name normalization shared by every stage.
//!
//! Two forms are derived from a raw display name:
//! - the join key, which stays faithful to the original name and aligns rows
//!   across independently produced tables;
//! - the lookup slug, which is aggressive (suffixes stripped) and is only used
//!   as a remote document identifier guess.

use once_cell::sync::Lazy;
use regex::Regex;

/// Character joining words inside a lookup slug.
pub const SLUG_JOINER: char = '_';

// Trailing family/corporate suffixes, matched case-insensitively against the
// space-separated name. Word suffixes need leading whitespace, so "Rolland"
// keeps its "and" and "Smithfamily" stays intact.
static SUFFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:\s*&\s*|\s+and\s+)family$",
        r"(?i)\s+family$",
        r"(?i)\s*&\s*co\.?$",
        r"(?i)\s*&\s*sons?$",
        r"(?i)\s*&\s*daughters?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("suffix pattern is valid"))
    .collect()
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalized name used to align rows across tables.
///
/// Non-breaking spaces become regular spaces and the result is trimmed of
/// surrounding whitespace and punctuation. Idempotent.
pub fn to_join_key(raw_name: &str) -> String {
    let replaced = raw_name.replace('\u{a0}', " ");
    replaced
        .trim_matches(|c: char| c.is_whitespace() || is_edge_punctuation(c))
        .to_string()
}

/// Remote identifier guess for a name: "Acme & Family" becomes "Acme".
pub fn to_lookup_slug(raw_name: &str) -> String {
    let spaced = WHITESPACE_RUN
        .replace_all(to_join_key(raw_name).as_str(), " ")
        .into_owned();
    let stripped = strip_trailing_suffix(&spaced);

    let mut slug = String::with_capacity(stripped.len());
    let mut last_joiner = false;
    for ch in stripped.chars() {
        let ch = if ch == ' ' { SLUG_JOINER } else { ch };
        if ch == SLUG_JOINER {
            if !last_joiner {
                slug.push(ch);
            }
            last_joiner = true;
        } else {
            slug.push(ch);
            last_joiner = false;
        }
    }
    slug.trim_matches(SLUG_JOINER).to_string()
}

/// Natural-language form of a slug, used as a title search query.
pub fn slug_to_query(slug: &str) -> String {
    slug.replace(SLUG_JOINER, " ")
}

/// Slug form of a title returned by the search service.
pub fn title_to_slug(title: &str) -> String {
    WHITESPACE_RUN
        .replace_all(title.trim(), SLUG_JOINER.to_string().as_str())
        .into_owned()
}

// At most one suffix is removed; patterns are ordered most specific first.
fn strip_trailing_suffix(name: &str) -> String {
    let trimmed = name.trim();
    SUFFIX_PATTERNS
        .iter()
        .find(|pattern| pattern.is_match(trimmed))
        .map(|pattern| pattern.replace(trimmed, "").trim().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

// Characters that never belong at the edge of a name. Closing parentheses and
// periods are kept because names such as "Jr." or "(Chair)" end with them.
fn is_edge_punctuation(c: char) -> bool {
    matches!(
        c,
        ',' | ';' | ':' | '"' | '\'' | '*' | '-' | '_' | '|' | '/' | '!' | '?'
    )
}
