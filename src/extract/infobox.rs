//! Querying the tabular info panel of an encyclopedic article.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static LABEL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid selector"));
static VALUE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));

const PANEL_CLASS: &str = "infobox";

/// First `table` carrying the `infobox` class, whatever its other classes
/// (`infobox biography vcard`, `infobox vcard`, ...).
pub fn find_panel(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&TABLE_SEL)
        .find(|table| table.value().classes().any(|c| c == PANEL_CLASS))
}

/// Value cell of the first panel row whose label satisfies `matches`.
///
/// Labels are compared on their trimmed text content.
pub fn find_field<'a, F>(panel: ElementRef<'a>, matches: F) -> Option<ElementRef<'a>>
where
    F: Fn(&str) -> bool,
{
    panel.select(&ROW_SEL).find_map(|row| {
        let label = row.select(&LABEL_SEL).next()?;
        if matches(text_of(label).trim()) {
            row.select(&VALUE_SEL).next()
        } else {
            None
        }
    })
}

/// Text content of an element with whitespace runs collapsed to single spaces.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table class="wikitable"><tr><th>Born</th><td>wrong table</td></tr></table>
          <table class="infobox biography vcard">
            <tr><th class="infobox-label">Born</th><td class="infobox-data">Somewhere</td></tr>
            <tr><th class="infobox-label">Alma&nbsp;mater</th><td>Harvard University</td></tr>
          </table>
        </body></html>"#;

    #[test]
    fn finds_panel_by_class_and_field_by_label() {
        let doc = Html::parse_document(PAGE);
        let panel = find_panel(&doc).expect("panel");
        let born = find_field(panel, |l| l == "Born").expect("born");
        assert_eq!(text_of(born), "Somewhere");
    }

    #[test]
    fn label_predicate_sees_normalized_text() {
        let doc = Html::parse_document(PAGE);
        let panel = find_panel(&doc).unwrap();
        let alma = find_field(panel, |l| l.to_lowercase().contains("alma")).unwrap();
        assert_eq!(text_of(alma), "Harvard University");
    }

    #[test]
    fn missing_panel_is_none() {
        let doc = Html::parse_document("<html><body><p>No panel</p></body></html>");
        assert!(find_panel(&doc).is_none());
    }
}
