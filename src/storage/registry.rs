//! Domain registry over the data directory.
//!
//! A domain exists iff its `<name>.jsonl` file exists. Creation is explicit
//! and exclusive; everywhere else a missing file reads as an empty domain.

use crate::config::LockSettings;
use crate::models::DomainName;
use crate::storage::DomainStore;
use crate::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Registry of domains under one data directory.
pub struct DomainRegistry {
    /// Directory holding the `*.jsonl` domain files.
    data_dir: PathBuf,
    /// Lock tuning handed to the stores this registry opens.
    lock: LockSettings,
}

impl DomainRegistry {
    /// Opens a registry over a data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock: LockSettings::default(),
        }
    }

    /// Overrides the lock tuning for stores opened by this registry.
    #[must_use]
    pub const fn with_lock_settings(mut self, lock: LockSettings) -> Self {
        self.lock = lock;
        self
    }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the backing file path for a domain.
    #[must_use]
    pub fn domain_path(&self, name: &DomainName) -> PathBuf {
        self.data_dir.join(name.file_name())
    }

    /// Creates a new, empty domain.
    ///
    /// # Errors
    ///
    /// Returns `Error::DomainExists` if the domain file already exists, or
    /// `Error::OperationFailed` on other I/O errors.
    pub fn add(&self, name: &DomainName) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| Error::OperationFailed {
            operation: "create_data_dir".to_string(),
            cause: e.to_string(),
        })?;

        let path = self.domain_path(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                tracing::info!(domain = %name, path = %path.display(), "created domain");
                Ok(())
            },
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::DomainExists {
                name: name.as_str().to_string(),
            }),
            Err(e) => Err(Error::OperationFailed {
                operation: "create_domain_file".to_string(),
                cause: e.to_string(),
            }),
        }
    }

    /// Lists registered domains, sorted by name.
    ///
    /// Files that are not `*.jsonl`, or whose stem is not a valid domain
    /// name, are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::OperationFailed` if the directory scan fails. A
    /// missing data directory lists as no domains.
    pub fn list(&self) -> Result<Vec<DomainName>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::OperationFailed {
                    operation: "read_data_dir".to_string(),
                    cause: e.to_string(),
                });
            },
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::OperationFailed {
                operation: "read_dir_entry".to_string(),
                cause: e.to_string(),
            })?;
            if let Some(name) = domain_from_path(&entry.path()) {
                names.push(name);
            }
        }
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(names)
    }

    /// Opens a store for a domain without requiring it to exist.
    ///
    /// Retrieval paths use this: an unregistered domain reads as empty.
    #[must_use]
    pub fn store(&self, name: &DomainName) -> DomainStore {
        DomainStore::new(self.domain_path(name)).with_lock_settings(self.lock)
    }

    /// Opens a store for a domain, failing if it is not registered.
    ///
    /// Mutating commands use this so that a typo cannot silently create a
    /// new domain file.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDomain` if the domain file does not exist.
    pub fn require(&self, name: &DomainName) -> Result<DomainStore> {
        let path = self.domain_path(name);
        if path.exists() {
            Ok(DomainStore::new(path).with_lock_settings(self.lock))
        } else {
            Err(Error::UnknownDomain {
                name: name.as_str().to_string(),
            })
        }
    }
}

/// Extracts a domain name from a `*.jsonl` path.
fn domain_from_path(path: &Path) -> Option<DomainName> {
    if path.extension().is_none_or(|ext| ext != "jsonl") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    DomainName::parse(stem).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    #[test]
    fn test_add_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path());

        registry.add(&name("cli")).unwrap();
        let path = dir.path().join("cli.jsonl");
        assert!(path.exists());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_add_twice_fails() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path());

        registry.add(&name("cli")).unwrap();
        match registry.add(&name("cli")) {
            Err(Error::DomainExists { name: n }) => assert_eq!(n, "cli"),
            other => panic!("expected DomainExists, got {other:?}"),
        }
    }

    #[test]
    fn test_list_sorted_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path());

        registry.add(&name("web")).unwrap();
        registry.add(&name("api")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        fs::write(dir.path().join("api.jsonl.lock"), b"").unwrap();

        let names: Vec<String> = registry
            .list()
            .unwrap()
            .iter()
            .map(|n| n.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["api", "web"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path().join("absent"));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_require_unknown_domain() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path());

        match registry.require(&name("ghost")) {
            Err(Error::UnknownDomain { name: n }) => assert_eq!(n, "ghost"),
            other => panic!("expected UnknownDomain, got {other:?}"),
        }
    }

    #[test]
    fn test_store_reads_unregistered_as_empty() {
        let dir = TempDir::new().unwrap();
        let registry = DomainRegistry::new(dir.path());
        let store = registry.store(&name("ghost"));
        assert!(store.read_all().unwrap().is_empty());
    }
}
