//! Field extraction from fetched documents and free text.
//!
//! Extraction is best effort: a missing panel, row or token yields empty
//! fields, never an error.

pub mod birth;
pub mod education;
pub mod infobox;

pub use birth::{extract_birth_date, BirthExtractor};
pub use education::{extract_education_text, parse_education, EducationExtractor};

/// Turns a resolver outcome for one entity into a table record.
pub trait Extractor: Send + Sync {
    type Record: Send + Sync;

    /// Field label used in logs and metrics.
    fn field(&self) -> &'static str;

    /// Record for an entity whose document was fetched.
    fn from_document(&self, lookup_name: String, slug: String, document: &str) -> Self::Record;

    /// Record for an entity with no document; `slug` is the last one attempted.
    fn unresolved(&self, lookup_name: String, slug: Option<String>) -> Self::Record;
}
