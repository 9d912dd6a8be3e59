//! Whole-record edit and delete at a resolved position.

use crate::models::{Record, RecordId};
use crate::services::capture::validate;
use crate::services::resolver::resolve_selector;
use crate::storage::DomainStore;
use crate::Result;

/// Replaces the record at a selector's position with `replacement`.
///
/// The replacement keeps the position but gets a fresh content-derived
/// identifier; editing a key field therefore changes the identifier, the
/// same as the original record being captured anew.
///
/// # Errors
///
/// Propagates resolver, validation, lock, and I/O failures. On any of
/// them the file is untouched.
pub fn edit_record(
    store: &DomainStore,
    selector: &str,
    replacement: Record,
) -> Result<RecordId> {
    validate(&replacement)?;
    store.mutate(|records| {
        let index = resolve_selector(records, selector)?;
        let mut replacement = replacement.clone();
        replacement.id = None;
        replacement.assign_id();
        let id = replacement.identity();
        records[index] = replacement;
        tracing::info!(id = %id, index, "edited record");
        Ok(id)
    })
}

/// Removes the record at a selector's position, returning it.
///
/// # Errors
///
/// Propagates resolver, lock, and I/O failures.
pub fn delete_record(store: &DomainStore, selector: &str) -> Result<Record> {
    store.mutate(|records| {
        let index = resolve_selector(records, selector)?;
        let removed = records.remove(index);
        tracing::info!(
            id = removed.id.as_ref().map_or("unassigned", RecordId::as_str),
            index,
            "deleted record"
        );
        Ok(removed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, RecordKind};
    use crate::services::capture::{CaptureRequest, capture};
    use crate::Error;
    use tempfile::TempDir;

    fn convention(content: &str) -> Record {
        Record::new(
            RecordKind::Convention {
                content: content.to_string(),
            },
            Classification::Tactical,
        )
    }

    fn seeded_store(dir: &TempDir) -> DomainStore {
        let store = DomainStore::new(dir.path().join("cli.jsonl"));
        capture(&store, CaptureRequest::new(convention("first"))).unwrap();
        capture(&store, CaptureRequest::new(convention("second"))).unwrap();
        store
    }

    #[test]
    fn test_edit_replaces_in_place_with_new_identity() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);
        let original = store.read_all().unwrap();
        let target_id = original[0].id.clone().unwrap();

        let new_id = edit_record(&store, target_id.as_str(), convention("rewritten")).unwrap();
        assert_ne!(new_id, target_id);

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind.key_field(), "rewritten");
        assert_eq!(records[0].id, Some(new_id));
        assert_eq!(records[1].kind.key_field(), "second");
    }

    #[test]
    fn test_edit_by_position() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        edit_record(&store, "2", convention("patched")).unwrap();
        let records = store.read_all().unwrap();
        assert_eq!(records[1].kind.key_field(), "patched");
    }

    #[test]
    fn test_delete_removes_and_returns() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        let removed = delete_record(&store, "1").unwrap();
        assert_eq!(removed.kind.key_field(), "first");

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind.key_field(), "second");
    }

    #[test]
    fn test_edit_unknown_selector_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);
        let before = store.read_all().unwrap();

        let err = edit_record(&store, "mx-000000", convention("nope")).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { .. }));
        assert_eq!(store.read_all().unwrap(), before);
    }

    #[test]
    fn test_edit_validates_replacement() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        let err = edit_record(&store, "1", convention("")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
