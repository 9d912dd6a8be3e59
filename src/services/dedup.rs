//! Duplicate detection and upsert policy.
//!
//! A candidate duplicates an existing record when both have the same kind
//! and an exactly equal key field (string equality, no normalization). The
//! first match in sequence order wins.

use crate::models::Record;

/// What a write command should do with a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupDisposition {
    /// No duplicate: append the candidate as a new entry.
    Append,
    /// Named-kind duplicate: replace the existing record in place.
    Replace {
        /// Position of the matched record.
        index: usize,
    },
    /// Content-identity duplicate: drop the candidate.
    Skip {
        /// Position of the matched record.
        index: usize,
    },
}

/// Finds the first existing record the candidate duplicates.
#[must_use]
pub fn find_duplicate(existing: &[Record], candidate: &Record) -> Option<usize> {
    existing.iter().position(|record| {
        record.kind.tag() == candidate.kind.tag()
            && record.kind.key_field() == candidate.kind.key_field()
    })
}

/// Applies the write policy to a candidate.
///
/// Named kinds (`pattern`, `decision`, `reference`, `guide`) upsert in
/// place on a match. Content-identity kinds (`convention`, `failure`) skip
/// the candidate unless `force` is set, in which case it is appended as a
/// second entry sharing the same computed identifier.
#[must_use]
pub fn classify_candidate(existing: &[Record], candidate: &Record, force: bool) -> DedupDisposition {
    match find_duplicate(existing, candidate) {
        None => DedupDisposition::Append,
        Some(index) if candidate.kind.is_named() => DedupDisposition::Replace { index },
        Some(_) if force => DedupDisposition::Append,
        Some(index) => DedupDisposition::Skip { index },
    }
}
