use tracing::{info, info_span, Instrument};

use crate::app::ports::RecordSinkPort;
use crate::error::Result;
use crate::extract::{BirthExtractor, EducationExtractor, Extractor};
use crate::normalize::to_join_key;
use crate::resolver::{ResolveState, Resolver};

/// Resolves each entity and extracts one record from its document.
///
/// Entities are processed one at a time; every record is handed to the
/// output port as soon as it exists.
pub struct EnrichUseCase<E: Extractor> {
    resolver: Resolver,
    extractor: E,
    output: Box<dyn RecordSinkPort<E::Record>>,
}

pub type BirthEnrichment = EnrichUseCase<BirthExtractor>;
pub type EducationEnrichment = EnrichUseCase<EducationExtractor>;

impl<E: Extractor> EnrichUseCase<E> {
    pub fn new(resolver: Resolver, extractor: E, output: Box<dyn RecordSinkPort<E::Record>>) -> Self {
        Self {
            resolver,
            extractor,
            output,
        }
    }

    /// Record for a single raw name. Never fails; missing data is empty fields.
    pub async fn enrich_entity(&self, raw_name: &str) -> E::Record {
        let lookup_name = to_join_key(raw_name);
        match self.resolver.resolve(raw_name).await {
            ResolveState::Resolved { slug, document, .. } => {
                self.extractor.from_document(lookup_name, slug, &document)
            }
            ResolveState::Degraded { slug, .. } => self.extractor.unresolved(lookup_name, slug),
            // resolve() only returns terminal states
            ResolveState::Direct { slug } | ResolveState::Search { slug } => {
                self.extractor.unresolved(lookup_name, Some(slug))
            }
        }
    }

    /// Enrich names in order. Only a failing output port aborts the batch.
    pub async fn enrich_batch(&self, names: &[Option<String>]) -> Result<Vec<E::Record>> {
        let total = names.len();
        let mut records = Vec::with_capacity(total);
        for (i, name) in names.iter().enumerate() {
            let name = name.as_deref().unwrap_or("");
            let span = info_span!("entity", kind = self.extractor.field(), n = i + 1, total);
            let record = self.enrich_entity(name).instrument(span).await;
            self.output.write_record(&record).await?;
            records.push(record);
        }
        info!(
            "Enriched {} entities for {}",
            records.len(),
            self.extractor.field()
        );
        Ok(records)
    }
}
