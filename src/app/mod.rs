// Application layer: ports and per-stage use cases

pub mod enrich_use_case;
pub mod merge_use_case;
pub mod ports;
pub mod split_education_use_case;

pub use enrich_use_case::{BirthEnrichment, EducationEnrichment, EnrichUseCase};
pub use merge_use_case::consolidate;
pub use split_education_use_case::split_education_table;
