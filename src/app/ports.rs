use async_trait::async_trait;

use crate::error::Result;

/// Result of asking the remote source for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Document body (HTML)
    Document(String),
    /// Identifier has no document
    NotFound,
    /// Timeout, connection failure or a non-success status other than not-found
    TransportError(String),
}

#[async_trait]
pub trait DocumentFetcherPort: Send + Sync {
    async fn fetch(&self, identifier: &str) -> FetchOutcome;
}

#[async_trait]
pub trait TitleSearchPort: Send + Sync {
    /// Top-ranked title for a natural-language query, if any.
    async fn search(&self, query: &str) -> std::result::Result<Option<String>, String>;
}

/// Spaces consecutive remote calls.
#[async_trait]
pub trait PolitenessPort: Send + Sync {
    async fn pause(&self);
}

/// Receives finished records one at a time so partial runs persist.
#[async_trait]
pub trait RecordSinkPort<R: Send + Sync>: Send + Sync {
    async fn write_record(&self, record: &R) -> Result<()>;
}
