//! Compaction: folding same-kind records into one consolidated record.
//!
//! The merged record carries `supersedes` links back to its inputs. The
//! pure merge lives in [`merge`]; [`compact_domain`] wraps it in the locked
//! read-modify-write cycle, removing the inputs and appending the merged
//! record at the end of the domain.

use crate::models::{Classification, Record, RecordKind, RecordRef};
use crate::services::resolver::resolve_selector;
use crate::storage::DomainStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Joins free-text fields with a blank-line separator, in input order.
fn join_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join("\n\n")
}

/// Picks the longest string; ties go to the first occurrence.
fn longest<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut best = "";
    for part in parts {
        if part.len() > best.len() {
            best = part;
        }
    }
    best.to_string()
}

/// Unions string lists, dropping duplicates, keeping first-appearance order.
fn union<'a>(lists: impl Iterator<Item = Option<&'a Vec<String>>>) -> Option<Vec<String>> {
    let mut seen = Vec::new();
    for list in lists.flatten() {
        for item in list {
            if !seen.contains(item) {
                seen.push(item.clone());
            }
        }
    }
    if seen.is_empty() { None } else { Some(seen) }
}

/// Merges two or more same-kind records into one consolidated record.
///
/// The result is `foundational`, stamped `merged_at`, and linked to its
/// inputs via `supersedes` (inputs without an identifier are omitted from
/// the links). Free-text fields concatenate in input order; name and title
/// fields take the longest input; tags and files union in first-appearance
/// order. The identifier is computed fresh from the merged key field and
/// may legitimately coincide with an input's identifier.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for fewer than two records or mixed
/// kinds. No mutation is attempted on failure.
pub fn merge(records: &[Record], merged_at: DateTime<Utc>) -> Result<Record> {
    let [first, rest @ ..] = records else {
        return Err(Error::InvalidInput(
            "compaction requires at least two records".to_string(),
        ));
    };
    if rest.is_empty() {
        return Err(Error::InvalidInput(
            "compaction requires at least two records".to_string(),
        ));
    }
    if rest.iter().any(|r| r.kind.tag() != first.kind.tag()) {
        return Err(Error::InvalidInput(format!(
            "compaction requires records of one kind, got mixed kinds starting from '{}'",
            first.kind.tag()
        )));
    }

    let kind = match &first.kind {
        RecordKind::Convention { .. } => RecordKind::Convention {
            content: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Convention { content } => content.as_str(),
                _ => "",
            })),
        },
        RecordKind::Pattern { .. } => RecordKind::Pattern {
            name: longest(records.iter().map(|r| r.kind.key_field())),
            description: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Pattern { description, .. } => description.as_str(),
                _ => "",
            })),
            files: union(records.iter().map(|r| match &r.kind {
                RecordKind::Pattern { files, .. } => files.as_ref(),
                _ => None,
            })),
        },
        RecordKind::Failure { .. } => RecordKind::Failure {
            description: join_text(records.iter().map(|r| r.kind.key_field())),
            resolution: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Failure { resolution, .. } => resolution.as_str(),
                _ => "",
            })),
        },
        RecordKind::Decision { .. } => RecordKind::Decision {
            title: longest(records.iter().map(|r| r.kind.key_field())),
            rationale: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Decision { rationale, .. } => rationale.as_str(),
                _ => "",
            })),
        },
        RecordKind::Reference { .. } => RecordKind::Reference {
            name: longest(records.iter().map(|r| r.kind.key_field())),
            description: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Reference { description, .. } => description.as_str(),
                _ => "",
            })),
            files: union(records.iter().map(|r| match &r.kind {
                RecordKind::Reference { files, .. } => files.as_ref(),
                _ => None,
            })),
        },
        RecordKind::Guide { .. } => RecordKind::Guide {
            name: longest(records.iter().map(|r| r.kind.key_field())),
            description: join_text(records.iter().map(|r| match &r.kind {
                RecordKind::Guide { description, .. } => description.as_str(),
                _ => "",
            })),
        },
    };

    let supersedes: Vec<RecordRef> = records
        .iter()
        .filter_map(|r| r.id.as_ref().map(RecordRef::local))
        .collect();

    let mut merged = Record {
        kind,
        classification: Classification::Foundational,
        recorded_at: merged_at,
        id: None,
        tags: union(records.iter().map(|r| r.tags.as_ref())),
        relates_to: None,
        supersedes: if supersedes.is_empty() {
            None
        } else {
            Some(supersedes)
        },
    };
    merged.assign_id();
    Ok(merged)
}

/// Compacts the selected records of a domain under lock.
///
/// Selectors (identifiers, prefixes, or 1-based positions) are resolved
/// against the current file contents; duplicate selections collapse to one
/// input. Inputs merge in selector order, are removed from the sequence,
/// and the merged record is appended at the end. All-or-nothing: any
/// resolution or precondition failure leaves the file untouched.
///
/// # Errors
///
/// Propagates resolver errors, merge precondition violations, and lock or
/// I/O failures.
pub fn compact_domain(store: &DomainStore, selectors: &[String]) -> Result<Record> {
    store.mutate(|records| {
        let mut indices = Vec::new();
        for selector in selectors {
            let index = resolve_selector(records, selector)?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        if indices.len() < 2 {
            return Err(Error::InvalidInput(
                "compaction requires at least two distinct records".to_string(),
            ));
        }

        let inputs: Vec<Record> = indices.iter().map(|&i| records[i].clone()).collect();
        let merged = merge(&inputs, Utc::now())?;

        let mut remove_order = indices;
        remove_order.sort_unstable_by(|a, b| b.cmp(a));
        for index in remove_order {
            records.remove(index);
        }
        records.push(merged.clone());

        tracing::info!(
            merged_id = %merged.identity(),
            inputs = inputs.len(),
            "compacted records"
        );
        Ok(merged)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().unwrap()
    }

    fn convention(content: &str, id: &str) -> Record {
        let mut rec = Record::new(
            RecordKind::Convention {
                content: content.to_string(),
            },
            Classification::Tactical,
        );
        rec.id = Some(RecordId::new(id));
        rec
    }

    #[test]
    fn test_merge_conventions_concatenates() {
        let a = convention("first rule", "mx-aaaaaa");
        let b = convention("second rule", "mx-bbbbbb");
        let merged = merge(&[a, b], at()).unwrap();

        match &merged.kind {
            RecordKind::Convention { content } => {
                assert_eq!(content, "first rule\n\nsecond rule");
            },
            other => panic!("expected convention, got {other:?}"),
        }
        assert_eq!(merged.classification, Classification::Foundational);
        assert_eq!(merged.recorded_at, at());
        let supersedes = merged.supersedes.unwrap();
        assert_eq!(supersedes.len(), 2);
        assert_eq!(supersedes[0].as_str(), "mx-aaaaaa");
        assert_eq!(supersedes[1].as_str(), "mx-bbbbbb");
    }

    #[test]
    fn test_merge_rejects_single_record() {
        let a = convention("only", "mx-aaaaaa");
        assert!(matches!(merge(&[a], at()), Err(Error::InvalidInput(_))));
        assert!(matches!(merge(&[], at()), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_merge_rejects_mixed_kinds() {
        let a = convention("conv", "mx-aaaaaa");
        let b = Record::new(
            RecordKind::Guide {
                name: "g".to_string(),
                description: "d".to_string(),
            },
            Classification::Tactical,
        );
        assert!(matches!(merge(&[a, b], at()), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_merge_patterns_longest_name_wins() {
        let mk = |name: &str, description: &str, files: Option<Vec<String>>| {
            let mut rec = Record::new(
                RecordKind::Pattern {
                    name: name.to_string(),
                    description: description.to_string(),
                    files,
                },
                Classification::Tactical,
            );
            rec.assign_id();
            rec
        };
        let a = mk("short", "desc a", Some(vec!["x.rs".to_string(), "y.rs".to_string()]));
        let b = mk("much longer name", "desc b", Some(vec!["y.rs".to_string(), "z.rs".to_string()]));
        let merged = merge(&[a, b], at()).unwrap();

        match &merged.kind {
            RecordKind::Pattern {
                name,
                description,
                files,
            } => {
                assert_eq!(name, "much longer name");
                assert_eq!(description, "desc a\n\ndesc b");
                assert_eq!(
                    files.as_deref(),
                    Some(["x.rs".to_string(), "y.rs".to_string(), "z.rs".to_string()].as_slice())
                );
            },
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_name_tie_keeps_first() {
        let mk = |name: &str| {
            Record::new(
                RecordKind::Guide {
                    name: name.to_string(),
                    description: "d".to_string(),
                },
                Classification::Tactical,
            )
        };
        let merged = merge(&[mk("alpha"), mk("bravo")], at()).unwrap();
        match &merged.kind {
            RecordKind::Guide { name, .. } => assert_eq!(name, "alpha"),
            other => panic!("expected guide, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_unions_tags_in_first_appearance_order() {
        let mut a = convention("a", "mx-aaaaaa");
        a.tags = Some(vec!["io".to_string(), "fs".to_string()]);
        let mut b = convention("b", "mx-bbbbbb");
        b.tags = Some(vec!["fs".to_string(), "lock".to_string()]);
        let merged = merge(&[a, b], at()).unwrap();
        assert_eq!(
            merged.tags,
            Some(vec!["io".to_string(), "fs".to_string(), "lock".to_string()])
        );
    }

    #[test]
    fn test_merge_skips_missing_ids_in_supersedes() {
        let a = convention("a", "mx-aaaaaa");
        let mut b = convention("b", "mx-bbbbbb");
        b.id = None;
        let merged = merge(&[a, b], at()).unwrap();
        let supersedes = merged.supersedes.unwrap();
        assert_eq!(supersedes.len(), 1);
        assert_eq!(supersedes[0].as_str(), "mx-aaaaaa");
    }

    #[test]
    fn test_merged_identity_computed_fresh() {
        let a = convention("first rule", "mx-aaaaaa");
        let b = convention("second rule", "mx-bbbbbb");
        let merged = merge(&[a, b], at()).unwrap();
        assert_eq!(merged.id, Some(merged.identity()));
    }

    #[test]
    fn test_merge_failures_joins_both_fields() {
        let mk = |description: &str, resolution: &str| {
            Record::new(
                RecordKind::Failure {
                    description: description.to_string(),
                    resolution: resolution.to_string(),
                },
                Classification::Observational,
            )
        };
        let merged = merge(&[mk("d1", "r1"), mk("d2", "r2")], at()).unwrap();
        match &merged.kind {
            RecordKind::Failure {
                description,
                resolution,
            } => {
                assert_eq!(description, "d1\n\nd2");
                assert_eq!(resolution, "r1\n\nr2");
            },
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
