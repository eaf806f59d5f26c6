use crate::constants;
use crate::error::Result;
use crate::merge::{AuxTable, ColumnSpec, Merger};
use crate::table::Table;

/// Birth columns carried into the consolidated table.
pub fn birth_column_specs() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::int(constants::YEAR_COLUMN, 1, 9999),
        ColumnSpec::int(constants::MONTH_COLUMN, 1, 12),
        ColumnSpec::int(constants::DAY_COLUMN, 1, 31),
    ]
}

/// Education pair columns carried into the consolidated table.
pub fn education_column_specs() -> Vec<ColumnSpec> {
    constants::education_pair_columns()
        .into_iter()
        .map(ColumnSpec::text)
        .collect()
}

/// Base list left-joined with birth data, then with split education data.
pub fn consolidate(base: &Table, birth: &Table, education: &Table) -> Result<Table> {
    Merger::new(base, constants::BASE_NAME_COLUMN)
        .join(AuxTable::new(
            birth,
            constants::LOOKUP_NAME_COLUMN,
            birth_column_specs(),
        ))
        .join(AuxTable::new(
            education,
            constants::LOOKUP_NAME_COLUMN,
            education_column_specs(),
        ))
        .merge()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_base_row_with_birth_and_empty_education() {
        let mut base = Table::new("base", vec!["name".into()]);
        base.push_row(vec![Some("A".into())]);
        let mut birth = Table::new(
            "birth",
            vec!["lookup_name".into(), "year".into()],
        );
        birth.push_row(vec![Some("A".into()), Some("1960".into())]);
        let education = Table::new(
            "education",
            std::iter::once("lookup_name")
                .chain(constants::education_pair_columns())
                .map(String::from)
                .collect(),
        );

        let out = consolidate(&base, &birth, &education).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out.headers,
            vec![
                "name",
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
        let year = out.column_index("year").unwrap();
        assert_eq!(out.cell(0, year), Some("1960"));
        for col in constants::education_pair_columns() {
            assert_eq!(out.cell(0, out.column_index(col).unwrap()), None);
        }
    }
}
