//! Retrieval across domains, optionally fitted to a token budget.
//!
//! Retrieval never takes the domain lock: `replace_all` is atomic at the
//! rename, so a read sees a fully-pre- or fully-post-mutation file, never
//! an interleaving.

use crate::models::DomainName;
use crate::services::budget::{CostEstimator, DomainRecords, allocate};
use crate::storage::DomainRegistry;
use crate::Result;

/// Request to read records from one or more domains.
#[derive(Debug, Clone)]
pub struct RecallRequest {
    /// Domains to read, in output order.
    pub domains: Vec<DomainName>,
    /// Token budget for the assembled output; `None` means unbounded.
    pub budget: Option<usize>,
}

/// Result of a recall.
#[derive(Debug)]
pub struct RecallResult {
    /// Domains with their (possibly budget-trimmed) records, in request
    /// order. With a budget, fully-rejected domains are omitted.
    pub domains: Vec<DomainRecords>,
    /// Records rejected by the budget.
    pub dropped_records: usize,
    /// Domains omitted because none of their records fit.
    pub dropped_domains: usize,
}

/// Reads the requested domains and optionally fits them to a budget.
///
/// An unregistered domain reads as empty rather than erroring; retrieval
/// is tolerant of absent files by design.
///
/// # Errors
///
/// Propagates read failures, including `Error::MalformedLine`.
pub fn recall(
    registry: &DomainRegistry,
    request: &RecallRequest,
    estimator: &dyn CostEstimator,
) -> Result<RecallResult> {
    let mut loaded = Vec::new();
    for name in &request.domains {
        let records = registry.store(name).read_all()?;
        tracing::debug!(domain = %name, records = records.len(), "loaded domain");
        loaded.push(DomainRecords {
            domain: name.as_str().to_string(),
            records,
        });
    }

    match request.budget {
        Some(budget) => {
            let report = allocate(&loaded, budget, estimator);
            Ok(RecallResult {
                domains: report.kept,
                dropped_records: report.dropped_records,
                dropped_domains: report.dropped_domains,
            })
        },
        None => Ok(RecallResult {
            domains: loaded,
            dropped_records: 0,
            dropped_domains: 0,
        }),
    }
}
