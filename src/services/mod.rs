//! Business logic services.
//!
//! Pure engines (dedup, resolver, compaction merge, budget allocation) and
//! the orchestrating operations that run them inside the storage layer's
//! locked read-modify-write cycle.

mod budget;
mod capture;
mod compaction;
mod dedup;
mod edit;
mod recall;
mod resolver;

pub use budget::{AllocationReport, CharCostEstimator, CostEstimator, DomainRecords, allocate};
pub use capture::{CaptureOutcome, CaptureRequest, capture};
pub use compaction::{compact_domain, merge};
pub use dedup::{DedupDisposition, classify_candidate, find_duplicate};
pub use edit::{delete_record, edit_record};
pub use recall::{RecallRequest, RecallResult, recall};
pub use resolver::{resolve, resolve_position, resolve_selector};
