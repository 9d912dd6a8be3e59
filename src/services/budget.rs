//! Token-budget-constrained record selection.
//!
//! Consumers of a retrieval response have a bounded context window. The
//! allocator fills it greedily in priority order: durable, cross-cutting
//! knowledge first, recent tactical detail next, stale observational
//! detail last. It is a single-pass priority fill, not a knapsack solver;
//! an oversized record is skipped without backfilling the slack later.

use crate::models::{Classification, Record, RecordKind};
use crate::rendering::render_record;

/// Cost estimator applied to a record's consumer-facing rendering.
///
/// Injected by the formatting layer; the allocator treats it as an opaque
/// pure function.
pub trait CostEstimator {
    /// Estimated token cost of one record.
    fn estimate(&self, record: &Record) -> usize;
}

/// Crude character-count heuristic: rendered length over four, rounded up.
///
/// Not a real tokenizer; kept deliberately replaceable behind the trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCostEstimator;

impl CostEstimator for CharCostEstimator {
    fn estimate(&self, record: &Record) -> usize {
        render_record(record).chars().count().div_ceil(4)
    }
}

/// Records of one domain, in their file order.
#[derive(Debug, Clone)]
pub struct DomainRecords {
    /// Domain name.
    pub domain: String,
    /// Records in domain-file order.
    pub records: Vec<Record>,
}

/// Result of a budget allocation.
#[derive(Debug)]
pub struct AllocationReport {
    /// Admitted records, regrouped by domain in the input domain order,
    /// each domain keeping its original relative record order.
    pub kept: Vec<DomainRecords>,
    /// Total records rejected across all domains.
    pub dropped_records: usize,
    /// Domains omitted from the output because nothing of theirs was kept.
    pub dropped_domains: usize,
}

/// Fixed type priority, ascending.
const fn kind_rank(kind: &RecordKind) -> u8 {
    match kind {
        RecordKind::Convention { .. } => 0,
        RecordKind::Decision { .. } => 1,
        RecordKind::Pattern { .. } => 2,
        RecordKind::Guide { .. } => 3,
        RecordKind::Failure { .. } => 4,
        RecordKind::Reference { .. } => 5,
    }
}

/// Classification priority, ascending.
const fn class_rank(classification: Classification) -> u8 {
    match classification {
        Classification::Foundational => 0,
        Classification::Tactical => 1,
        Classification::Observational => 2,
    }
}

/// Selects the highest-priority subset of records that fits the budget.
///
/// Priority is (type, classification, recency descending); ties beyond
/// that are unordered. Admission is greedy in priority order: a record is
/// kept only if the running total plus its estimated cost stays within
/// `budget`. The output preserves input ordering, never the sorted order.
#[must_use]
pub fn allocate(
    domains: &[DomainRecords],
    budget: usize,
    estimator: &dyn CostEstimator,
) -> AllocationReport {
    let mut order: Vec<(usize, usize)> = domains
        .iter()
        .enumerate()
        .flat_map(|(di, domain)| (0..domain.records.len()).map(move |ri| (di, ri)))
        .collect();

    // Unstable sort: tie order beyond the three keys is not part of the
    // contract and must not be relied upon.
    order.sort_unstable_by(|&(da, ra), &(db, rb)| {
        let a = &domains[da].records[ra];
        let b = &domains[db].records[rb];
        kind_rank(&a.kind)
            .cmp(&kind_rank(&b.kind))
            .then_with(|| class_rank(a.classification).cmp(&class_rank(b.classification)))
            .then_with(|| b.recorded_at.cmp(&a.recorded_at))
    });

    let mut admitted: Vec<Vec<bool>> = domains
        .iter()
        .map(|domain| vec![false; domain.records.len()])
        .collect();
    let mut spent = 0usize;
    let mut dropped_records = 0usize;

    for (di, ri) in order {
        let cost = estimator.estimate(&domains[di].records[ri]);
        if spent + cost <= budget {
            spent += cost;
            admitted[di][ri] = true;
        } else {
            dropped_records += 1;
        }
    }

    let mut kept = Vec::new();
    for (di, domain) in domains.iter().enumerate() {
        let records: Vec<Record> = domain
            .records
            .iter()
            .enumerate()
            .filter(|(ri, _)| admitted[di][*ri])
            .map(|(_, record)| record.clone())
            .collect();
        if !records.is_empty() {
            kept.push(DomainRecords {
                domain: domain.domain.clone(),
                records,
            });
        }
    }
    let dropped_domains = domains.len() - kept.len();

    if dropped_records > 0 {
        tracing::debug!(
            budget,
            spent,
            dropped_records,
            dropped_domains,
            "budget allocation dropped records"
        );
    }

    AllocationReport {
        kept,
        dropped_records,
        dropped_domains,
    }
}
