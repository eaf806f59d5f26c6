//! Education text scraping and splitting into (institution, degree) pairs.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::infobox::{find_field, find_panel, text_of};
use super::Extractor;
use crate::types::{EducationPair, EducationPairs, EducationRecord, EDUCATION_SLOTS};

/// Label fragments tried in order; "Alma mater" wins over "Education".
const LABEL_TERMS: [&str; 2] = ["alma", "education"];

// Text before a parenthesized group, and the group's contents. Nested
// parentheses are not supported; the innermost group wins.
static PAIR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^()]*)\(([^()]*)\)").expect("valid regex"));

/// Raw education text of the article's subject, if the info panel has it.
pub fn extract_education_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let panel = find_panel(&document)?;

    let value = LABEL_TERMS.iter().find_map(|term| {
        find_field(panel, |label| label.to_lowercase().contains(term))
    });
    let Some(value) = value else {
        debug!("No education row in info panel");
        return None;
    };

    let text = text_of(value);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Split free-text education into exactly three ordered pairs.
///
/// `"Harvard University (MBA), MIT (BSc)"` yields `("Harvard University",
/// "MBA")`, `("MIT", "BSc")` and one empty pair. Text without any complete
/// parenthesized group becomes a single institution with no degree. A group
/// with nothing before it yields a pair with no institution.
pub fn parse_education(text: Option<&str>) -> EducationPairs {
    let Some(raw) = text else {
        return EducationPairs::empty();
    };
    let normalized = raw.replace('\u{a0}', " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return EducationPairs::empty();
    }

    let pairs: Vec<EducationPair> = PAIR_PATTERN
        .captures_iter(trimmed)
        .take(EDUCATION_SLOTS)
        .map(|caps| {
            let institution = clean_institution(&caps[1]);
            let degree = non_empty(caps[2].trim());
            EducationPair::new(institution, degree)
        })
        .collect();

    if pairs.is_empty() {
        return EducationPairs::from_pairs([EducationPair::new(
            Some(trimmed.to_string()),
            None,
        )]);
    }
    EducationPairs::from_pairs(pairs)
}

// Separators left over from the previous pair sit at the front; trailing ones
// precede the parenthesis.
fn clean_institution(text: &str) -> Option<String> {
    non_empty(text.trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';'))
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Builds raw education rows from resolved documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct EducationExtractor;

impl Extractor for EducationExtractor {
    type Record = EducationRecord;

    fn field(&self) -> &'static str {
        "education"
    }

    fn from_document(&self, lookup_name: String, slug: String, document: &str) -> EducationRecord {
        let education = extract_education_text(document);
        if education.is_none() {
            crate::observability::metrics::extract::parse_miss(self.field());
        } else {
            crate::observability::metrics::extract::field_found(self.field());
        }
        EducationRecord {
            lookup_name,
            resolved_slug: Some(slug),
            education,
        }
    }

    fn unresolved(&self, lookup_name: String, slug: Option<String>) -> EducationRecord {
        EducationRecord {
            lookup_name,
            resolved_slug: slug,
            education: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(institution: Option<&str>, degree: Option<&str>) -> EducationPair {
        EducationPair::new(institution.map(String::from), degree.map(String::from))
    }

    #[test]
    fn splits_multiple_pairs() {
        let parsed = parse_education(Some("Harvard University (MBA), MIT (BSc)"));
        assert_eq!(
            parsed.0,
            [
                pair(Some("Harvard University"), Some("MBA")),
                pair(Some("MIT"), Some("BSc")),
                pair(None, None),
            ]
        );
    }

    #[test]
    fn no_parentheses_is_single_institution() {
        let parsed = parse_education(Some("Stanford University"));
        assert_eq!(
            parsed.0,
            [
                pair(Some("Stanford University"), None),
                pair(None, None),
                pair(None, None),
            ]
        );
    }

    #[test]
    fn empty_or_missing_is_all_empty() {
        assert_eq!(parse_education(Some("")), EducationPairs::empty());
        assert_eq!(parse_education(Some("  \u{a0} ")), EducationPairs::empty());
        assert_eq!(parse_education(None), EducationPairs::empty());
    }

    #[test]
    fn stops_after_three_pairs() {
        let parsed = parse_education(Some("A (BA); B (MA); C (PhD); D (JD)"));
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.0[2], pair(Some("C"), Some("PhD")));
    }

    #[test]
    fn arity_is_always_three() {
        for input in [
            "",
            "x",
            "(",
            ")(",
            "A (B) C (D) E (F) G (H)",
            "Only (one",
            "Harvard (MBA (hons))",
        ] {
            assert_eq!(parse_education(Some(input)).len(), 3, "input {:?}", input);
        }
    }

    #[test]
    fn leading_group_has_no_institution() {
        let parsed = parse_education(Some("(BS) Caltech (PhD)"));
        assert_eq!(parsed.0[0], pair(None, Some("BS")));
        assert_eq!(parsed.0[1], pair(Some("Caltech"), Some("PhD")));
    }

    #[test]
    fn unbalanced_parenthesis_falls_back_to_full_text() {
        let parsed = parse_education(Some("Yale University (BA"));
        assert_eq!(parsed.0[0], pair(Some("Yale University (BA"), None));
    }

    #[test]
    fn degree_is_trimmed_and_nbsp_normalized() {
        let parsed = parse_education(Some("University\u{a0}of Pennsylvania ( BS, BA )"));
        assert_eq!(
            parsed.0[0],
            pair(Some("University of Pennsylvania"), Some("BS, BA"))
        );
    }

    #[test]
    fn extracts_alma_mater_before_education() {
        let html = r#"<html><body><table class="infobox vcard">
            <tr><th class="infobox-label">Education</th><td>Lakeside School</td></tr>
            <tr><th class="infobox-label">Alma mater</th><td><a href="/wiki/Harvard">Harvard University</a> (<a>BA</a>)</td></tr>
            </table></body></html>"#;
        assert_eq!(
            extract_education_text(html).as_deref(),
            Some("Harvard University ( BA )")
        );
    }

    #[test]
    fn falls_back_to_education_label() {
        let html = r#"<html><body><table class="infobox">
            <tr><th>Education</th><td>Stanford University (BS)</td></tr>
            </table></body></html>"#;
        assert_eq!(
            extract_education_text(html).as_deref(),
            Some("Stanford University (BS)")
        );
    }

    #[test]
    fn missing_row_is_none() {
        let html = r#"<html><body><table class="infobox">
            <tr><th>Born</th><td>1955</td></tr></table></body></html>"#;
        assert_eq!(extract_education_text(html), None);
    }
}
