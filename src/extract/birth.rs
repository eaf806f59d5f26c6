//! Birth date extraction from the "Born" row of an info panel.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::infobox::{find_field, find_panel};
use super::Extractor;
use crate::types::{BirthDate, BirthRecord};

const BORN_LABEL: &str = "Born";

static BDAY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".bday").expect("valid selector"));
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Birth date of the article's subject, or all-`None` when any step misses.
pub fn extract_birth_date(html: &str) -> BirthDate {
    let document = Html::parse_document(html);

    let Some(panel) = find_panel(&document) else {
        debug!("No info panel in document");
        return BirthDate::default();
    };
    let Some(born) = find_field(panel, |label| label == BORN_LABEL) else {
        debug!("No '{}' row in info panel", BORN_LABEL);
        return BirthDate::default();
    };
    let Some(token) = born.select(&BDAY_SEL).next() else {
        debug!("No machine-readable date in '{}' row", BORN_LABEL);
        return BirthDate::default();
    };

    let text: String = token.text().collect();
    parse_iso_date(text.trim()).unwrap_or_default()
}

/// Strict `YYYY-MM-DD` parse; calendar-invalid dates are rejected.
pub fn parse_iso_date(token: &str) -> Option<BirthDate> {
    if !ISO_DATE.is_match(token) {
        return None;
    }
    let date = NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()?;
    Some(BirthDate {
        year: Some(date.year()),
        month: Some(date.month()),
        day: Some(date.day()),
    })
}

/// Builds birth-table rows from resolved documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthExtractor;

impl Extractor for BirthExtractor {
    type Record = BirthRecord;

    fn field(&self) -> &'static str {
        "birth_date"
    }

    fn from_document(&self, lookup_name: String, slug: String, document: &str) -> BirthRecord {
        let date = extract_birth_date(document);
        if date.is_empty() {
            crate::observability::metrics::extract::parse_miss(self.field());
        } else {
            crate::observability::metrics::extract::field_found(self.field());
        }
        BirthRecord::new(lookup_name, Some(slug), date)
    }

    fn unresolved(&self, lookup_name: String, slug: Option<String>) -> BirthRecord {
        BirthRecord::new(lookup_name, slug, BirthDate::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(born_cell: &str) -> String {
        format!(
            r#"<html><body><table class="infobox biography vcard">
                 <tr><th class="infobox-label">Born</th><td class="infobox-data">{}</td></tr>
                 <tr><th class="infobox-label">Occupation</th><td>Investor</td></tr>
               </table></body></html>"#,
            born_cell
        )
    }

    #[test]
    fn extracts_bday_token() {
        let html = page(
            r#"William Henry Gates III<br><span style="display:none">(<span class="bday">1955-10-28</span>)</span>
               October 28, 1955 (age 70)"#,
        );
        assert_eq!(
            extract_birth_date(&html),
            BirthDate {
                year: Some(1955),
                month: Some(10),
                day: Some(28)
            }
        );
    }

    #[test]
    fn missing_panel_yields_nulls() {
        let html = r#"<html><body><p>Born <span class="bday">1955-10-28</span></p></body></html>"#;
        assert!(extract_birth_date(html).is_empty());
    }

    #[test]
    fn missing_born_row_yields_nulls() {
        let html = r#"<html><body><table class="infobox">
            <tr><th>Died</th><td><span class="bday">1955-10-28</span></td></tr>
            </table></body></html>"#;
        assert!(extract_birth_date(html).is_empty());
    }

    #[test]
    fn missing_or_malformed_token_yields_nulls() {
        assert!(extract_birth_date(&page("October 28, 1955")).is_empty());
        assert!(extract_birth_date(&page(r#"<span class="bday">1955-10</span>"#)).is_empty());
        assert!(extract_birth_date(&page(r#"<span class="bday">c. 1955</span>"#)).is_empty());
    }

    #[test]
    fn calendar_invalid_token_is_rejected() {
        assert_eq!(parse_iso_date("1955-13-01"), None);
        assert_eq!(parse_iso_date("1955-02-30"), None);
        assert_eq!(parse_iso_date(" 1955-10-28"), None);
    }

    #[test]
    fn extractor_tags_records() {
        let rec = BirthExtractor.from_document(
            "Bill Gates".into(),
            "Bill_Gates".into(),
            &page(r#"<span class="bday">1955-10-28</span>"#),
        );
        assert_eq!(rec.resolved_slug.as_deref(), Some("Bill_Gates"));
        assert_eq!(rec.year, Some(1955));

        let rec = BirthExtractor.unresolved("Nobody".into(), Some("Nobody".into()));
        assert_eq!(rec.year, None);
        assert_eq!(rec.month, None);
        assert_eq!(rec.day, None);
    }
}
