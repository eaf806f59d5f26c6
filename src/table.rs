//! In-memory entity tables with CSV persistence.
//!
//! Cells are `Option<String>`: an empty CSV field reads as `None` and `None`
//! writes as an empty field.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{EnrichError, Result};

pub type Cell = Option<String>;
pub type Row = Vec<Cell>;

/// Anything that can be written as one row of a fixed-header table.
pub trait TableRow {
    fn header() -> Vec<&'static str>;
    fn to_row(&self) -> Row;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Label used in error messages and logs
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_records<R: TableRow>(name: impl Into<String>, records: &[R]) -> Self {
        Self {
            name: name.into(),
            headers: R::header().into_iter().map(String::from).collect(),
            rows: records.iter().map(TableRow::to_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Index of `column`, or `MissingColumn` when absent.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| EnrichError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Values of one column in row order.
    pub fn column_values(&self, column: &str) -> Result<Vec<Cell>> {
        let idx = self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(idx).cloned().flatten())
            .collect())
    }

    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Keep only the first `limit` rows.
    pub fn truncate(&mut self, limit: usize) {
        self.rows.truncate(limit);
    }

    pub fn read_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(name, headers);
        for record in rdr.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            table.push_row(row);
        }
        Ok(table)
    }

    pub fn read_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            EnrichError::Config(format!("Failed to open table '{}': {}", path.display(), e))
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string();
        Self::read_csv(name, file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}
