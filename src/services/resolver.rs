//! Identifier resolution.
//!
//! Maps a user-supplied identifier to a unique record position. Accepted
//! shapes: a full identifier (`mx-1a2b3c`), a bare hex fragment, or any
//! non-empty prefix of either. Legacy 1-based positional addressing stays
//! valid alongside and bypasses the identifier matching entirely.

use crate::models::Record;
use crate::{Error, Result};

/// Resolves an identifier (full, bare, or prefix) to a record position.
///
/// An exact full-identifier match is tried first; with content-derived
/// identifiers, forced duplicates share an id and the first occurrence
/// wins. Otherwise the fragment is treated as a prefix and must match
/// exactly one record.
///
/// # Errors
///
/// `Error::AmbiguousIdentifier` when two or more records match the prefix
/// (listing every distinct matching identifier), `Error::RecordNotFound`
/// when none do.
pub fn resolve(records: &[Record], identifier: &str) -> Result<usize> {
    let fragment = identifier.strip_prefix("mx-").unwrap_or(identifier);
    if fragment.is_empty() {
        return Err(Error::RecordNotFound {
            input: identifier.to_string(),
        });
    }
    let full = format!("mx-{fragment}");

    if let Some(index) = records
        .iter()
        .position(|record| record.id.as_ref().is_some_and(|id| id.as_str() == full))
    {
        return Ok(index);
    }

    let matches: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record
                .id
                .as_ref()
                .is_some_and(|id| id.as_str().starts_with(full.as_str()))
        })
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::RecordNotFound {
            input: identifier.to_string(),
        }),
        [index] => Ok(*index),
        indexes => {
            let mut candidates = Vec::new();
            for &index in indexes {
                if let Some(id) = &records[index].id {
                    let id = id.as_str().to_string();
                    if !candidates.contains(&id) {
                        candidates.push(id);
                    }
                }
            }
            Err(Error::AmbiguousIdentifier {
                input: identifier.to_string(),
                candidates,
            })
        },
    }
}

/// Resolves a legacy 1-based position to a record index.
///
/// # Errors
///
/// `Error::RecordNotFound` if the position is zero or past the end.
pub fn resolve_position(records: &[Record], position: usize) -> Result<usize> {
    if position >= 1 && position <= records.len() {
        Ok(position - 1)
    } else {
        Err(Error::RecordNotFound {
            input: position.to_string(),
        })
    }
}

/// Resolves a selector that is either a 1-based position or an identifier.
///
/// An all-digits selector is positional; anything else goes through
/// identifier resolution. Both addressing modes stay valid simultaneously.
///
/// # Errors
///
/// Propagates the errors of [`resolve`] and [`resolve_position`].
pub fn resolve_selector(records: &[Record], selector: &str) -> Result<usize> {
    match selector.parse::<usize>() {
        Ok(position) => resolve_position(records, position),
        Err(_) => resolve(records, selector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, Record, RecordId, RecordKind};

    fn with_id(content: &str, id: &str) -> Record {
        let mut record = Record::new(
            RecordKind::Convention {
                content: content.to_string(),
            },
            Classification::Tactical,
        );
        record.id = Some(RecordId::new(id));
        record
    }

    fn sample() -> Vec<Record> {
        vec![
            with_id("one", "mx-abc123"),
            with_id("two", "mx-abd456"),
            with_id("three", "mx-f00d00"),
        ]
    }

    #[test]
    fn test_full_identifier_match() {
        assert_eq!(resolve(&sample(), "mx-abd456").unwrap(), 1);
    }

    #[test]
    fn test_bare_fragment_match() {
        assert_eq!(resolve(&sample(), "f00d00").unwrap(), 2);
    }

    #[test]
    fn test_unique_prefix_match() {
        assert_eq!(resolve(&sample(), "f0").unwrap(), 2);
        assert_eq!(resolve(&sample(), "mx-abc").unwrap(), 0);
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        match resolve(&sample(), "ab") {
            Err(Error::AmbiguousIdentifier { candidates, .. }) => {
                assert_eq!(candidates, vec!["mx-abc123", "mx-abd456"]);
            },
            other => panic!("expected AmbiguousIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(
            resolve(&sample(), "999999"),
            Err(Error::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_fragment_not_found() {
        assert!(matches!(
            resolve(&sample(), "mx-"),
            Err(Error::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_full_id_resolves_to_first() {
        let records = vec![
            with_id("forced original", "mx-abc123"),
            with_id("forced copy", "mx-abc123"),
        ];
        assert_eq!(resolve(&records, "mx-abc123").unwrap(), 0);
    }

    #[test]
    fn test_duplicate_id_prefix_candidates_deduped() {
        let records = vec![
            with_id("forced original", "mx-abc123"),
            with_id("forced copy", "mx-abc123"),
        ];
        match resolve(&records, "abc") {
            Err(Error::AmbiguousIdentifier { candidates, .. }) => {
                assert_eq!(candidates, vec!["mx-abc123"]);
            },
            other => panic!("expected AmbiguousIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_positions_are_one_based() {
        let records = sample();
        assert_eq!(resolve_position(&records, 1).unwrap(), 0);
        assert_eq!(resolve_position(&records, 3).unwrap(), 2);
        assert!(resolve_position(&records, 0).is_err());
        assert!(resolve_position(&records, 4).is_err());
    }

    #[test]
    fn test_selector_prefers_position_for_digits() {
        let records = sample();
        assert_eq!(resolve_selector(&records, "2").unwrap(), 1);
        assert_eq!(resolve_selector(&records, "mx-f00d00").unwrap(), 2);
    }
}
