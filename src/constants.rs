/// Source endpoints and table column names shared by every stage.
/// Column names must match across stages, so they live here instead of at call sites.

pub const DEFAULT_ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";
pub const DEFAULT_SEARCH_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; bio_enrich/0.1)";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

// Politeness window between remote calls
pub const DEFAULT_MIN_DELAY_MS: u64 = 400;
pub const DEFAULT_MAX_DELAY_MS: u64 = 1000;

pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const CONFIG_PATH: &str = "config.toml";

// Base table
pub const BASE_NAME_COLUMN: &str = "name";

// Intermediate tables
pub const LOOKUP_NAME_COLUMN: &str = "lookup_name";
pub const RESOLVED_SLUG_COLUMN: &str = "resolved_slug";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";
pub const EDUCATION_COLUMN: &str = "education";

pub const UNIVERSITY_COLUMNS: [&str; 3] = ["university_1", "university_2", "university_3"];
pub const DEGREE_COLUMNS: [&str; 3] = ["degree_1", "degree_2", "degree_3"];

// Seed preparation
pub const RANKING_KEY: &str = "ranking";
pub const SEED_DROPPED_COLUMNS: [&str; 3] = ["id", "image", "previous_worth"];

/// Columns of the birth table, in output order.
pub fn birth_columns() -> Vec<&'static str> {
    vec![
        LOOKUP_NAME_COLUMN,
        RESOLVED_SLUG_COLUMN,
        YEAR_COLUMN,
        MONTH_COLUMN,
        DAY_COLUMN,
    ]
}

/// Columns of the raw education table, in output order.
pub fn education_columns() -> Vec<&'static str> {
    vec![LOOKUP_NAME_COLUMN, RESOLVED_SLUG_COLUMN, EDUCATION_COLUMN]
}

/// Interleaved `university_N`, `degree_N` columns appended by the split stage.
pub fn education_pair_columns() -> Vec<&'static str> {
    UNIVERSITY_COLUMNS
        .iter()
        .zip(DEGREE_COLUMNS.iter())
        .flat_map(|(u, d)| [*u, *d])
        .collect()
}
