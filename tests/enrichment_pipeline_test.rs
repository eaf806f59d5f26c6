use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bio_enrich::app::ports::{DocumentFetcherPort, FetchOutcome, TitleSearchPort};
use bio_enrich::infra::politeness::NoDelay;
use bio_enrich::pipeline::Pipeline;
use bio_enrich::resolver::Resolver;
use bio_enrich::table::Table;
use tempfile::tempdir;
use tokio::sync::Mutex;

fn article(bday: Option<&str>, alma: Option<&str>) -> String {
    let mut rows = String::new();
    if let Some(b) = bday {
        rows.push_str(&format!(
            r#"<tr><th class="infobox-label">Born</th><td class="infobox-data">(<span class="bday">{}</span>)</td></tr>"#,
            b
        ));
    }
    if let Some(a) = alma {
        rows.push_str(&format!(
            r#"<tr><th class="infobox-label">Alma mater</th><td class="infobox-data">{}</td></tr>"#,
            a
        ));
    }
    format!(
        r#"<html><body><table class="infobox biography vcard"><tbody>{}</tbody></table></body></html>"#,
        rows
    )
}

struct FakeWiki {
    pages: HashMap<String, String>,
    titles: HashMap<String, String>,
    fetches: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DocumentFetcherPort for FakeWiki {
    async fn fetch(&self, identifier: &str) -> FetchOutcome {
        self.fetches.lock().await.push(identifier.to_string());
        match self.pages.get(identifier) {
            Some(page) => FetchOutcome::Document(page.clone()),
            None => FetchOutcome::NotFound,
        }
    }
}

#[async_trait]
impl TitleSearchPort for FakeWiki {
    async fn search(&self, query: &str) -> std::result::Result<Option<String>, String> {
        Ok(self.titles.get(query).cloned())
    }
}

fn fake_wiki() -> (Arc<FakeWiki>, Arc<Mutex<Vec<String>>>) {
    let fetches = Arc::new(Mutex::new(Vec::new()));
    let pages = [
        (
            "Bill_Gates",
            article(Some("1955-10-28"), Some("Harvard University (dropped out)")),
        ),
        (
            "Mukesh_Ambani",
            article(
                Some("1957-04-19"),
                Some("Institute of Chemical Technology (BE), Stanford University"),
            ),
        ),
        ("Françoise_Bettencourt_Meyers", article(Some("1953-07-10"), None)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let titles = [
        (
            "Francoise Bettencourt Meyers",
            "Françoise Bettencourt Meyers",
        ),
        ("Ghost Person", "Ghost Person (disambiguation)"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    (
        Arc::new(FakeWiki {
            pages,
            titles,
            fetches: fetches.clone(),
        }),
        fetches,
    )
}

#[tokio::test]
async fn full_run_produces_consolidated_table() -> Result<()> {
    let temp_dir = tempdir()?;
    let base_csv = "rank,name,net_worth\n\
                    1,Bill Gates,100\n\
                    2,Francoise Bettencourt Meyers & family,90\n\
                    3,Ghost Person,80\n\
                    4,Mukesh\u{a0}Ambani,70\n\
                    5,Bill Gates,100\n";
    let base = Table::read_csv("base", base_csv.as_bytes())?;

    let (wiki, fetches) = fake_wiki();
    let pipeline = Pipeline::new(Resolver::new(wiki.clone(), wiki, Arc::new(NoDelay)));
    let result = pipeline.run(&base, temp_dir.path(), "2025-01-31").await?;

    assert_eq!(result.base_rows, 5);
    assert_eq!(result.birth_dates_found, 4);
    assert!(result.merged_file.ends_with("merged_dataset_2025-01-31.csv"));

    let merged = Table::read_csv_path(&result.merged_file)?;
    assert_eq!(
        merged.headers,
        vec![
            "rank",
            "name",
            "net_worth",
            "year",
            "month",
            "day",
            "university_1",
            "degree_1",
            "university_2",
            "degree_2",
            "university_3",
            "degree_3"
        ]
    );
    assert_eq!(merged.len(), 5);

    let col = |name: &str| merged.column_index(name).unwrap();
    let ranks: Vec<_> = (0..5).map(|i| merged.cell(i, col("rank"))).collect();
    assert_eq!(ranks, vec![Some("1"), Some("2"), Some("3"), Some("4"), Some("5")]);

    // Direct hit
    assert_eq!(merged.cell(0, col("year")), Some("1955"));
    assert_eq!(merged.cell(0, col("university_1")), Some("Harvard University"));
    assert_eq!(merged.cell(0, col("degree_1")), Some("dropped out"));

    // Suffix stripped, resolved through search
    assert_eq!(
        merged.cell(1, col("name")),
        Some("Francoise Bettencourt Meyers & family")
    );
    assert_eq!(merged.cell(1, col("month")), Some("7"));
    assert_eq!(merged.cell(1, col("university_1")), None);

    // Search suggestion that is also missing: every enrichment column empty
    for c in 3..12 {
        assert_eq!(merged.cell(2, c), None, "column {}", merged.headers[c]);
    }

    // Non-breaking space normalized in the join key
    assert_eq!(merged.cell(3, col("name")), Some("Mukesh Ambani"));
    assert_eq!(merged.cell(3, col("day")), Some("19"));
    assert_eq!(
        merged.cell(3, col("university_1")),
        Some("Institute of Chemical Technology")
    );
    assert_eq!(merged.cell(3, col("degree_1")), Some("BE"));
    assert_eq!(merged.cell(3, col("university_2")), None);

    // Repeated base name gets the same values
    assert_eq!(merged.cell(4, col("year")), Some("1955"));

    // Ghost Person: direct + suggested title only, in both stages
    let ghost: Vec<_> = fetches
        .lock()
        .await
        .iter()
        .filter(|s| s.starts_with("Ghost_Person"))
        .cloned()
        .collect();
    assert_eq!(
        ghost,
        vec![
            "Ghost_Person",
            "Ghost_Person_(disambiguation)",
            "Ghost_Person",
            "Ghost_Person_(disambiguation)"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn intermediate_tables_are_persisted() -> Result<()> {
    let temp_dir = tempdir()?;
    let base = Table::read_csv("base", "name\nBill Gates\nNobody\n".as_bytes())?;

    let (wiki, _) = fake_wiki();
    let pipeline = Pipeline::new(Resolver::new(wiki.clone(), wiki, Arc::new(NoDelay)));
    let out = temp_dir.path().join("birth.csv");
    pipeline.run_birth(&base, &out).await?;

    let birth = Table::read_csv_path(&out)?;
    assert_eq!(
        birth.headers,
        vec!["lookup_name", "resolved_slug", "year", "month", "day"]
    );
    assert_eq!(birth.len(), 2);
    assert_eq!(birth.cell(0, 1), Some("Bill_Gates"));
    assert_eq!(birth.cell(1, 0), Some("Nobody"));
    assert_eq!(birth.cell(1, 1), Some("Nobody"));
    assert_eq!(birth.cell(1, 2), None);
    Ok(())
}

#[tokio::test]
async fn base_without_name_column_fails_before_fetching() -> Result<()> {
    let temp_dir = tempdir()?;
    let base = Table::read_csv("base", "person\nBill Gates\n".as_bytes())?;

    let (wiki, fetches) = fake_wiki();
    let pipeline = Pipeline::new(Resolver::new(wiki.clone(), wiki, Arc::new(NoDelay)));
    let result = pipeline.run(&base, temp_dir.path(), "2025-01-31").await;

    assert!(result.is_err());
    assert!(fetches.lock().await.is_empty());
    Ok(())
}
