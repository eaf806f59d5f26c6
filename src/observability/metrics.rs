//! Metrics for enrichment runs
//!
//! Recording goes through the `metrics` facade; `init` installs a Prometheus
//! recorder so a run can log a rendered snapshot when it finishes.

use std::fmt;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Resolver metrics
    ResolverResolved,
    ResolverDegraded,
    ResolverRemoteFetches,
    ResolverRemoteSearches,

    // Extraction metrics
    ExtractParseMiss,
    ExtractFieldsFound,

    // Merge metrics
    MergeRowsOutput,
    MergeUnmatchedRows,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ResolverResolved => "enrich_resolver_resolved_total",
            MetricName::ResolverDegraded => "enrich_resolver_degraded_total",
            MetricName::ResolverRemoteFetches => "enrich_resolver_remote_fetches_total",
            MetricName::ResolverRemoteSearches => "enrich_resolver_remote_searches_total",
            MetricName::ExtractParseMiss => "enrich_extract_parse_miss_total",
            MetricName::ExtractFieldsFound => "enrich_extract_fields_found_total",
            MetricName::MergeRowsOutput => "enrich_merge_rows_output_total",
            MetricName::MergeUnmatchedRows => "enrich_merge_unmatched_rows_total",
        }
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            METRICS_HANDLE.set(handle).ok();
            info!("Metrics recorder installed");
        }
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Rendered Prometheus text for everything recorded so far.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Resolver Metrics
// ============================================================================

pub mod resolver {
    use super::MetricName;
    use crate::resolver::{DegradeReason, ResolvedVia};

    pub fn resolved(via: ResolvedVia) {
        ::metrics::counter!(MetricName::ResolverResolved.as_str(), "via" => via.as_str())
            .increment(1);
    }

    pub fn degraded(reason: &DegradeReason) {
        ::metrics::counter!(MetricName::ResolverDegraded.as_str(), "reason" => reason.as_str())
            .increment(1);
    }

    pub fn remote_fetch() {
        ::metrics::counter!(MetricName::ResolverRemoteFetches.as_str()).increment(1);
    }

    pub fn remote_search() {
        ::metrics::counter!(MetricName::ResolverRemoteSearches.as_str()).increment(1);
    }
}

// ============================================================================
// Extraction Metrics
// ============================================================================

pub mod extract {
    use super::MetricName;

    /// Expected structure was absent in a fetched document
    pub fn parse_miss(field: &'static str) {
        ::metrics::counter!(MetricName::ExtractParseMiss.as_str(), "field" => field).increment(1);
    }

    pub fn field_found(field: &'static str) {
        ::metrics::counter!(MetricName::ExtractFieldsFound.as_str(), "field" => field).increment(1);
    }
}

// ============================================================================
// Merge Metrics
// ============================================================================

pub mod merge {
    use super::MetricName;

    pub fn rows_output(count: usize) {
        ::metrics::counter!(MetricName::MergeRowsOutput.as_str()).increment(count as u64);
    }

    pub fn unmatched_rows(table: &str, count: usize) {
        ::metrics::counter!(MetricName::MergeUnmatchedRows.as_str(), "table" => table.to_string())
            .increment(count as u64);
    }
}
