//! Left-join consolidation of entity tables on the normalized name.
//!
//! The base table fixes the output row count and order. Every auxiliary table
//! contributes its declared columns; rows without a match get `None`.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::normalize::to_join_key;
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Nullable integer; anything non-numeric or outside `min..=max` becomes `None`
    Int { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Text,
        }
    }

    pub fn int(name: &str, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Int { min, max },
        }
    }

    fn coerce(&self, cell: Option<&str>) -> Cell {
        match self.kind {
            ColumnKind::Text => cell.map(str::to_string),
            ColumnKind::Int { min, max } => {
                coerce_int(cell?, min, max).map(|v| v.to_string())
            }
        }
    }
}

/// An auxiliary table joined on `key_column`.
#[derive(Debug, Clone)]
pub struct AuxTable<'a> {
    pub table: &'a Table,
    pub key_column: String,
    pub columns: Vec<ColumnSpec>,
}

impl<'a> AuxTable<'a> {
    pub fn new(table: &'a Table, key_column: &str, columns: Vec<ColumnSpec>) -> Self {
        Self {
            table,
            key_column: key_column.to_string(),
            columns,
        }
    }
}

// Join key -> first row index, plus the source index of each declared column.
struct AuxIndex {
    rows: HashMap<String, usize>,
    columns: Vec<Option<usize>>,
}

impl AuxIndex {
    fn build(aux: &AuxTable<'_>) -> Self {
        let table = aux.table;
        let columns = aux
            .columns
            .iter()
            .map(|spec| {
                let idx = table.column_index(&spec.name);
                if idx.is_none() && !table.headers.is_empty() {
                    warn!(
                        "Table '{}' has no column '{}'; values will be empty",
                        table.name, spec.name
                    );
                }
                idx
            })
            .collect();

        let mut rows = HashMap::new();
        let Some(key_idx) = table.column_index(&aux.key_column) else {
            if !table.is_empty() {
                warn!(
                    "Table '{}' has no key column '{}'; no rows will match",
                    table.name, aux.key_column
                );
            }
            return Self { rows, columns };
        };

        let mut duplicates = 0usize;
        for (i, _) in table.rows.iter().enumerate() {
            let Some(raw) = table.cell(i, key_idx) else {
                continue;
            };
            let key = to_join_key(raw);
            if rows.contains_key(&key) {
                duplicates += 1;
            } else {
                rows.insert(key, i);
            }
        }
        if duplicates > 0 {
            warn!(
                "Table '{}' has {} duplicate keys; first occurrence kept",
                table.name, duplicates
            );
        }
        Self { rows, columns }
    }
}

pub struct Merger<'a> {
    base: &'a Table,
    base_key: String,
    aux: Vec<AuxTable<'a>>,
}

impl<'a> Merger<'a> {
    pub fn new(base: &'a Table, base_key: &str) -> Self {
        Self {
            base,
            base_key: base_key.to_string(),
            aux: Vec::new(),
        }
    }

    /// Add an auxiliary table; tables are joined in the order they are added.
    pub fn join(mut self, aux: AuxTable<'a>) -> Self {
        self.aux.push(aux);
        self
    }

    /// Produce the consolidated table. Fails only when the base key column is
    /// absent.
    pub fn merge(&self) -> Result<Table> {
        let base_key_idx = self.base.require_column(&self.base_key)?;

        let mut headers = self.base.headers.clone();
        for aux in &self.aux {
            for spec in &aux.columns {
                if headers.contains(&spec.name) {
                    warn!(
                        "Column '{}' from '{}' duplicates an existing column",
                        spec.name, aux.table.name
                    );
                }
                headers.push(spec.name.clone());
            }
        }

        let indexes: Vec<AuxIndex> = self.aux.iter().map(AuxIndex::build).collect();
        let mut unmatched = vec![0usize; self.aux.len()];
        let mut out = Table::new("consolidated", headers);

        for (i, base_row) in self.base.rows.iter().enumerate() {
            let key = self.base.cell(i, base_key_idx).map(to_join_key);
            let mut row = base_row.clone();
            row.resize(self.base.headers.len(), None);
            row[base_key_idx] = key.clone();

            for (n, (aux, index)) in self.aux.iter().zip(&indexes).enumerate() {
                let matched = key.as_ref().and_then(|k| index.rows.get(k)).copied();
                if matched.is_none() {
                    unmatched[n] += 1;
                }
                for (spec, col) in aux.columns.iter().zip(&index.columns) {
                    let cell = match (matched, col) {
                        (Some(r), Some(c)) => spec.coerce(aux.table.cell(r, *c)),
                        _ => None,
                    };
                    row.push(cell);
                }
            }
            out.rows.push(row);
        }

        for (aux, count) in self.aux.iter().zip(&unmatched) {
            debug!("{} base rows unmatched in '{}'", count, aux.table.name);
            crate::observability::metrics::merge::unmatched_rows(&aux.table.name, *count);
        }
        crate::observability::metrics::merge::rows_output(out.len());
        info!(
            "Merged {} base rows against {} tables",
            out.len(),
            self.aux.len()
        );
        Ok(out)
    }
}

/// Integer value of a numeric token, accepting integral floats such as "1960.0".
pub fn coerce_int(token: &str, min: i64, max: i64) -> Option<i64> {
    let token = token.trim();
    let value = match token.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = token.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    (min..=max).contains(&value).then_some(value)
}
