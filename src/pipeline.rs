use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::app::ports::{PolitenessPort, RecordSinkPort};
use crate::app::{consolidate, split_education_table, BirthEnrichment, EducationEnrichment};
use crate::config::Config;
use crate::constants;
use crate::error::Result;
use crate::extract::{BirthExtractor, EducationExtractor};
use crate::infra::csv_output_adapter::CsvRecordSink;
use crate::infra::http_client::ReqwestWiki;
use crate::infra::politeness::{NoDelay, RandomDelay};
use crate::resolver::Resolver;
use crate::table::{Cell, Table};
use crate::types::{BirthRecord, EducationRecord};

/// Summary of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub base_rows: usize,
    pub birth_dates_found: usize,
    pub education_found: usize,
    pub birth_file: PathBuf,
    pub education_file: PathBuf,
    pub split_education_file: PathBuf,
    pub merged_file: PathBuf,
    pub duration_secs: f64,
}

/// Resolver wired to the configured remote source.
pub fn build_resolver(config: &Config) -> Result<Resolver> {
    let wiki = Arc::new(ReqwestWiki::new(&config.source)?);
    let politeness: Arc<dyn PolitenessPort> = if config.politeness.enabled {
        Arc::new(RandomDelay::new(
            config.politeness.min_delay(),
            config.politeness.max_delay(),
        ))
    } else {
        Arc::new(NoDelay)
    };
    Ok(Resolver::new(wiki.clone(), wiki, politeness))
}

/// Names of the base table in row order.
pub fn base_names(base: &Table) -> Result<Vec<Cell>> {
    base.column_values(constants::BASE_NAME_COLUMN)
}

/// `<dir>/<prefix>_<stamp>.csv`
pub fn stamped_path(dir: &Path, prefix: &str, stamp: &str) -> PathBuf {
    dir.join(format!("{}_{}.csv", prefix, stamp))
}

pub fn today_stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub struct Pipeline {
    resolver: Resolver,
}

impl Pipeline {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(build_resolver(config)?))
    }

    /// Birth table for every base row, written to `out` as rows are produced.
    #[instrument(skip(self, base))]
    pub async fn run_birth(&self, base: &Table, out: &Path) -> Result<Table> {
        let names = base_names(base)?;
        let sink: Box<dyn RecordSinkPort<BirthRecord>> =
            Box::new(CsvRecordSink::<BirthRecord>::create(out)?);
        let use_case = BirthEnrichment::new(self.resolver.clone(), BirthExtractor, sink);
        let records = use_case.enrich_batch(&names).await?;
        Ok(Table::from_records("birth", &records))
    }

    /// Raw education table for every base row, written to `out` as rows are produced.
    #[instrument(skip(self, base))]
    pub async fn run_education(&self, base: &Table, out: &Path) -> Result<Table> {
        let names = base_names(base)?;
        let sink: Box<dyn RecordSinkPort<EducationRecord>> =
            Box::new(CsvRecordSink::<EducationRecord>::create(out)?);
        let use_case = EducationEnrichment::new(self.resolver.clone(), EducationExtractor, sink);
        let records = use_case.enrich_batch(&names).await?;
        Ok(Table::from_records("education", &records))
    }

    /// Birth, education, split and merge; every intermediate table is
    /// written under `output_dir` with the given stamp.
    #[instrument(skip(self, base))]
    pub async fn run(&self, base: &Table, output_dir: &Path, stamp: &str) -> Result<PipelineResult> {
        let started = Instant::now();
        // Fail on a malformed base list before any remote call.
        base.require_column(constants::BASE_NAME_COLUMN)?;

        let birth_file = stamped_path(output_dir, "date_of_birth", stamp);
        let education_file = stamped_path(output_dir, "university_degree", stamp);
        let split_education_file = stamped_path(output_dir, "split_education", stamp);
        let merged_file = stamped_path(output_dir, "merged_dataset", stamp);

        info!("Step 1: birth dates for {} entities", base.len());
        let birth = self.run_birth(base, &birth_file).await?;

        info!("Step 2: education for {} entities", base.len());
        let education = self.run_education(base, &education_file).await?;

        info!("Step 3: splitting education");
        let split = split_education_table(&education)?;
        split.write_csv_path(&split_education_file)?;

        info!("Step 4: merging");
        let merged = consolidate(base, &birth, &split)?;
        merged.write_csv_path(&merged_file)?;

        let year_idx = birth.require_column(constants::YEAR_COLUMN)?;
        let edu_idx = education.require_column(constants::EDUCATION_COLUMN)?;
        let result = PipelineResult {
            base_rows: base.len(),
            birth_dates_found: (0..birth.len())
                .filter(|&i| birth.cell(i, year_idx).is_some())
                .count(),
            education_found: (0..education.len())
                .filter(|&i| education.cell(i, edu_idx).is_some())
                .count(),
            birth_file,
            education_file,
            split_education_file,
            merged_file,
            duration_secs: started.elapsed().as_secs_f64(),
        };
        info!(
            "Pipeline finished: {} rows, {} birth dates, {} education entries in {:.1}s",
            result.base_rows,
            result.birth_dates_found,
            result.education_found,
            result.duration_secs
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamped_path_layout() {
        let p = stamped_path(Path::new("data/interim"), "merged_dataset", "2025-01-31");
        assert_eq!(p, PathBuf::from("data/interim/merged_dataset_2025-01-31.csv"));
    }

    #[test]
    fn pipeline_result_serializes_as_flat_json() {
        let result = PipelineResult {
            base_rows: 2,
            birth_dates_found: 1,
            education_found: 0,
            birth_file: PathBuf::from("out/date_of_birth_2025-01-31.csv"),
            education_file: PathBuf::from("out/university_degree_2025-01-31.csv"),
            split_education_file: PathBuf::from("out/split_education_2025-01-31.csv"),
            merged_file: PathBuf::from("out/merged_dataset_2025-01-31.csv"),
            duration_secs: 1.5,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["base_rows"], 2);
        assert_eq!(value["merged_file"], "out/merged_dataset_2025-01-31.csv");
        assert_eq!(value["duration_secs"], 1.5);
    }

    #[test]
    fn today_stamp_is_iso_date() {
        let stamp = today_stamp();
        assert_eq!(stamp.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&stamp, "%Y-%m-%d").is_ok());
    }
}
