//! Base list preparation from a saved ranking response.

use serde_json::Value;
use tracing::info;

use crate::constants;
use crate::error::{EnrichError, Result};
use crate::table::{Cell, Table};

/// Flatten `{"ranking": [{...}, ...]}` into a table.
///
/// Columns appear in first-seen key order across all entries; the columns in
/// `SEED_DROPPED_COLUMNS` are removed.
pub fn ranking_to_table(data: &Value) -> Result<Table> {
    let entries = data
        .get(constants::RANKING_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            EnrichError::Malformed(format!(
                "expected an object with a '{}' array",
                constants::RANKING_KEY
            ))
        })?;

    let mut headers: Vec<String> = Vec::new();
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            return Err(EnrichError::Malformed(
                "ranking entries must be objects".into(),
            ));
        };
        for key in obj.keys() {
            if !constants::SEED_DROPPED_COLUMNS.contains(&key.as_str()) && !headers.contains(key)
            {
                headers.push(key.clone());
            }
        }
    }

    let mut table = Table::new("base", headers);
    for entry in entries {
        let row = table
            .headers
            .iter()
            .map(|h| entry.get(h).and_then(cell_of))
            .collect();
        table.push_row(row);
    }
    if table.column_index(constants::BASE_NAME_COLUMN).is_none() {
        return Err(EnrichError::MissingColumn {
            table: table.name,
            column: constants::BASE_NAME_COLUMN.to_string(),
        });
    }
    info!(
        "Prepared base list with {} rows and {} columns",
        table.len(),
        table.headers.len()
    );
    Ok(table)
}

fn cell_of(value: &Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
