//! Direct-then-search lookup of a remote document for an entity name.
//!
//! Each entity walks `Direct -> (Search) -> Resolved | Degraded`. At most two
//! document fetches and one title search are made per entity, and no failure
//! escapes: absence of data ends in `Degraded`.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::app::ports::{DocumentFetcherPort, FetchOutcome, PolitenessPort, TitleSearchPort};
use crate::normalize::{slug_to_query, title_to_slug, to_lookup_slug};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    Direct,
    Search,
}

impl ResolvedVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedVia::Direct => "direct",
            ResolvedVia::Search => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// Name normalized to an empty slug; nothing was fetched
    EmptyName,
    /// Direct fetch failed with something other than not-found
    DirectTransport(String),
    /// Title search failed
    SearchTransport(String),
    /// Title search returned no suggestion
    NoSuggestion,
    /// Suggested title was not found
    SuggestionNotFound,
    /// Suggested title fetch failed
    SuggestionTransport(String),
}

impl DegradeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradeReason::EmptyName => "empty_name",
            DegradeReason::DirectTransport(_) => "direct_transport",
            DegradeReason::SearchTransport(_) => "search_transport",
            DegradeReason::NoSuggestion => "no_suggestion",
            DegradeReason::SuggestionNotFound => "suggestion_not_found",
            DegradeReason::SuggestionTransport(_) => "suggestion_transport",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    Direct {
        slug: String,
    },
    Search {
        slug: String,
    },
    Resolved {
        slug: String,
        document: String,
        via: ResolvedVia,
    },
    Degraded {
        /// Last slug attempted, `None` when nothing was attempted
        slug: Option<String>,
        reason: DegradeReason,
    },
}

impl ResolveState {
    /// Starting state for a raw name.
    pub fn start(raw_name: &str) -> Self {
        let slug = to_lookup_slug(raw_name);
        if slug.is_empty() {
            ResolveState::Degraded {
                slug: None,
                reason: DegradeReason::EmptyName,
            }
        } else {
            ResolveState::Direct { slug }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolveState::Resolved { .. } | ResolveState::Degraded { .. }
        )
    }

    /// Slug of the resolved document, or the last slug attempted.
    pub fn slug(&self) -> Option<&str> {
        match self {
            ResolveState::Direct { slug }
            | ResolveState::Search { slug }
            | ResolveState::Resolved { slug, .. } => Some(slug),
            ResolveState::Degraded { slug, .. } => slug.as_deref(),
        }
    }

    /// Transition out of `Direct` given the outcome of fetching its slug.
    pub fn after_direct(slug: String, outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Document(document) => ResolveState::Resolved {
                slug,
                document,
                via: ResolvedVia::Direct,
            },
            FetchOutcome::NotFound => ResolveState::Search { slug },
            FetchOutcome::TransportError(e) => ResolveState::Degraded {
                slug: Some(slug),
                reason: DegradeReason::DirectTransport(e),
            },
        }
    }

    /// Transition out of `Search` once the search has run and, when it
    /// suggested a title, that title's slug has been fetched.
    pub fn after_search(
        slug: String,
        search: std::result::Result<Option<String>, String>,
        fetched: Option<(String, FetchOutcome)>,
    ) -> Self {
        match (search, fetched) {
            (Err(e), _) => ResolveState::Degraded {
                slug: Some(slug),
                reason: DegradeReason::SearchTransport(e),
            },
            (Ok(None), _) => ResolveState::Degraded {
                slug: Some(slug),
                reason: DegradeReason::NoSuggestion,
            },
            (Ok(Some(_)), None) => ResolveState::Degraded {
                slug: Some(slug),
                reason: DegradeReason::NoSuggestion,
            },
            (Ok(Some(_)), Some((found, outcome))) => match outcome {
                FetchOutcome::Document(document) => ResolveState::Resolved {
                    slug: found,
                    document,
                    via: ResolvedVia::Search,
                },
                FetchOutcome::NotFound => ResolveState::Degraded {
                    slug: Some(found),
                    reason: DegradeReason::SuggestionNotFound,
                },
                FetchOutcome::TransportError(e) => ResolveState::Degraded {
                    slug: Some(found),
                    reason: DegradeReason::SuggestionTransport(e),
                },
            },
        }
    }
}

/// Drives [`ResolveState`] against the remote collaborators.
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn DocumentFetcherPort>,
    search: Arc<dyn TitleSearchPort>,
    politeness: Arc<dyn PolitenessPort>,
}

impl Resolver {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcherPort>,
        search: Arc<dyn TitleSearchPort>,
        politeness: Arc<dyn PolitenessPort>,
    ) -> Self {
        Self {
            fetcher,
            search,
            politeness,
        }
    }

    /// Resolve a raw name to a terminal state. Never fails.
    #[instrument(skip(self), fields(slug))]
    pub async fn resolve(&self, raw_name: &str) -> ResolveState {
        let mut state = ResolveState::start(raw_name);
        if let Some(slug) = state.slug() {
            tracing::Span::current().record("slug", slug);
        }

        while !state.is_terminal() {
            state = self.step(state).await;
        }

        match &state {
            ResolveState::Resolved { slug, via, .. } => {
                info!("Resolved '{}' via {}", slug, via.as_str());
                crate::observability::metrics::resolver::resolved(*via);
            }
            ResolveState::Degraded { slug, reason } => {
                warn!(
                    "Degraded lookup for {:?} (last slug {:?}): {}",
                    raw_name,
                    slug,
                    reason.as_str()
                );
                crate::observability::metrics::resolver::degraded(reason);
            }
            _ => {}
        }
        state
    }

    async fn step(&self, state: ResolveState) -> ResolveState {
        match state {
            ResolveState::Direct { slug } => {
                let outcome = self.fetch(&slug).await;
                ResolveState::after_direct(slug, outcome)
            }
            ResolveState::Search { slug } => {
                let query = slug_to_query(&slug);
                self.politeness.pause().await;
                debug!("Searching titles for '{}'", query);
                crate::observability::metrics::resolver::remote_search();
                let search = self.search.search(&query).await;

                let fetched = match &search {
                    Ok(Some(title)) => {
                        let found = title_to_slug(title);
                        if found.is_empty() {
                            None
                        } else {
                            let outcome = self.fetch(&found).await;
                            Some((found, outcome))
                        }
                    }
                    _ => None,
                };
                ResolveState::after_search(slug, search, fetched)
            }
            terminal => terminal,
        }
    }

    async fn fetch(&self, slug: &str) -> FetchOutcome {
        self.politeness.pause().await;
        debug!("Fetching document '{}'", slug);
        crate::observability::metrics::resolver::remote_fetch();
        self.fetcher.fetch(slug).await
    }
}
