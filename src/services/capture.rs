//! Record capture: validation plus the dedup/upsert policy, applied inside
//! the locked read-modify-write cycle.

use crate::models::{Record, RecordId, RecordKind};
use crate::services::dedup::{DedupDisposition, classify_candidate};
use crate::storage::DomainStore;
use crate::{Error, Result};

/// Request to capture a record into a domain.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// The record to store.
    pub record: Record,
    /// Append a content-identity duplicate instead of skipping it.
    pub force: bool,
}

impl CaptureRequest {
    /// Creates a capture request for a record.
    #[must_use]
    pub const fn new(record: Record) -> Self {
        Self {
            record,
            force: false,
        }
    }

    /// Sets the force flag.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// How a capture landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Stored as a new entry.
    Appended {
        /// Identifier of the stored record.
        id: RecordId,
    },
    /// Replaced an existing record in place (named-kind upsert).
    Updated {
        /// Identifier of the stored record.
        id: RecordId,
        /// Position that was replaced.
        index: usize,
    },
    /// Dropped as an exact duplicate of an existing record.
    Skipped {
        /// Identifier of the record already present.
        id: RecordId,
        /// Position of the existing record.
        index: usize,
    },
}

impl CaptureOutcome {
    /// Identifier of the record the outcome refers to.
    #[must_use]
    pub const fn id(&self) -> &RecordId {
        match self {
            Self::Appended { id } | Self::Updated { id, .. } | Self::Skipped { id, .. } => id,
        }
    }
}

/// Validates a record's required fields.
///
/// # Errors
///
/// Returns `Error::InvalidInput` naming the first empty required field.
pub(crate) fn validate(record: &Record) -> Result<()> {
    let check = |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(Error::InvalidInput(format!(
                "{} requires a non-empty {field}",
                record.kind.tag()
            )))
        } else {
            Ok(())
        }
    };
    match &record.kind {
        RecordKind::Convention { content } => check("content", content),
        RecordKind::Pattern {
            name, description, ..
        }
        | RecordKind::Reference {
            name, description, ..
        }
        | RecordKind::Guide { name, description } => {
            check("name", name)?;
            check("description", description)
        },
        RecordKind::Failure {
            description,
            resolution,
        } => {
            check("description", description)?;
            check("resolution", resolution)
        },
        RecordKind::Decision { title, rationale } => {
            check("title", title)?;
            check("rationale", rationale)
        },
    }
}

/// Captures a record into a domain.
///
/// Runs the whole cycle under the domain lock: read all, apply the dedup
/// policy, write back atomically. A skipped duplicate still rewrites the
/// same contents, which is a no-op for readers.
///
/// # Errors
///
/// Propagates validation, lock, and I/O failures.
pub fn capture(store: &DomainStore, request: CaptureRequest) -> Result<CaptureOutcome> {
    validate(&request.record)?;

    store.mutate(|records| {
        let mut candidate = request.record.clone();
        candidate.assign_id();
        let id = candidate.identity();

        let outcome = match classify_candidate(records, &candidate, request.force) {
            DedupDisposition::Append => {
                records.push(candidate);
                CaptureOutcome::Appended { id }
            },
            DedupDisposition::Replace { index } => {
                records[index] = candidate;
                CaptureOutcome::Updated { id, index }
            },
            DedupDisposition::Skip { index } => {
                tracing::debug!(id = %id, index, "skipped exact duplicate");
                CaptureOutcome::Skipped { id, index }
            },
        };
        Ok(outcome)
    })
}
