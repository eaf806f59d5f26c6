use tracing::info;

use crate::constants;
use crate::error::Result;
use crate::extract::parse_education;
use crate::table::Table;

/// Append `university_1, degree_1, ..., degree_3` parsed from the raw
/// `education` column. Existing columns are kept unchanged.
pub fn split_education_table(table: &Table) -> Result<Table> {
    let edu_idx = table.require_column(constants::EDUCATION_COLUMN)?;

    let mut headers = table.headers.clone();
    headers.extend(
        constants::education_pair_columns()
            .into_iter()
            .map(String::from),
    );
    let mut out = Table::new(table.name.clone(), headers);

    let mut with_degree = 0usize;
    for (i, row) in table.rows.iter().enumerate() {
        let pairs = parse_education(table.cell(i, edu_idx));
        if pairs.iter().any(|p| p.degree.is_some()) {
            with_degree += 1;
        }
        let mut new_row = row.clone();
        new_row.resize(table.headers.len(), None);
        new_row.extend(pairs.to_cells());
        out.rows.push(new_row);
    }
    info!(
        "Split education for {} rows ({} with a degree)",
        out.len(),
        with_degree
    );
    Ok(out)
}
