//! Line-delimited record store for one domain file.
//!
//! `read_all` and `replace_all` are the only primitives; every higher-level
//! write (capture, edit, delete, compact) is a locked "read all, compute the
//! new full sequence, replace all" expressed through [`DomainStore::mutate`].
//! `replace_all` writes a temp file in the same directory and renames it
//! over the target, so a concurrent lock-free `read_all` sees either the
//! old file or the new one, never an interleaving.

use crate::config::LockSettings;
use crate::models::Record;
use crate::storage::lock::with_lock;
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handle to one domain's backing file.
#[derive(Debug)]
pub struct DomainStore {
    /// Path of the domain file.
    path: PathBuf,
    /// Lock tuning used by `mutate`.
    lock: LockSettings,
}

impl DomainStore {
    /// Creates a store handle for a domain file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: LockSettings::default(),
        }
    }

    /// Overrides the lock tuning (tests shorten the timeouts).
    #[must_use]
    pub const fn with_lock_settings(mut self, lock: LockSettings) -> Self {
        self.lock = lock;
        self
    }

    /// Returns the domain file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in the domain.
    ///
    /// A missing file reads as an empty sequence. Blank lines are ignored;
    /// order is the file order.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedLine` (with path and 1-based line number)
    /// for the first line that fails to parse. The core never skips bad
    /// lines silently.
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::OperationFailed {
                    operation: "read_domain_file".to_string(),
                    cause: e.to_string(),
                });
            },
        };

        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(line).map_err(|e| Error::MalformedLine {
                    path: self.path.clone(),
                    line: index + 1,
                    cause: e.to_string(),
                })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Atomically replaces the domain's contents with `records`.
    ///
    /// Records lacking an identifier get their content-derived one assigned
    /// first. Serialization is one record per line with a trailing newline;
    /// an empty set writes a zero-length file.
    ///
    /// # Errors
    ///
    /// Returns `Error::OperationFailed` if serialization or the write
    /// fails. On rename failure the original file is untouched and the
    /// temp file is removed (it is deleted when its handle drops).
    pub fn replace_all(&self, mut records: Vec<Record>) -> Result<()> {
        for record in &mut records {
            record.assign_id();
        }

        let mut buf = String::new();
        for record in &records {
            let line = serde_json::to_string(record).map_err(|e| Error::OperationFailed {
                operation: "serialize_record".to_string(),
                cause: e.to_string(),
            })?;
            buf.push_str(&line);
            buf.push('\n');
        }

        // The temp file must live in the target directory: rename is only
        // atomic within one filesystem.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::OperationFailed {
            operation: "create_temp_file".to_string(),
            cause: e.to_string(),
        })?;
        tmp.write_all(buf.as_bytes())
            .map_err(|e| Error::OperationFailed {
                operation: "write_temp_file".to_string(),
                cause: e.to_string(),
            })?;
        tmp.persist(&self.path).map_err(|e| Error::OperationFailed {
            operation: "replace_domain_file".to_string(),
            cause: e.error.to_string(),
        })?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "replaced domain file"
        );
        Ok(())
    }

    /// Runs one locked read-modify-write cycle.
    ///
    /// `f` receives the full in-memory sequence and may reorder, replace,
    /// or extend it; whatever it leaves behind is written back atomically.
    /// If `f` fails, nothing is written.
    ///
    /// # Errors
    ///
    /// Propagates lock, read, and write errors, and whatever `f` returns.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> Result<T>) -> Result<T> {
        with_lock(&self.path, &self.lock, || {
            let mut records = self.read_all()?;
            let value = f(&mut records)?;
            self.replace_all(records)?;
            Ok(value)
        })
    }
}
