//! # Mnemex
//!
//! A concurrency-safe, file-backed expertise store for AI coding agents.
//!
//! Mnemex keeps structured expertise notes (conventions, patterns, failures,
//! decisions, references, guides) partitioned into named domains, one
//! line-delimited JSON file per domain. Multiple independent processes may
//! read and mutate the same domain concurrently; cooperating writers are
//! serialized by an advisory lock and every mutation lands atomically.
//!
//! ## Features
//!
//! - Deterministic content-addressed identifiers (`mx-` + 6 hex digits)
//! - Duplicate detection with upsert semantics for named record kinds
//! - Multi-record compaction with provenance links
//! - Token-budget-constrained retrieval across domains
//! - Advisory per-domain locking with stale-lock recovery
//!
//! ## Example
//!
//! ```rust,ignore
//! use mnemex::{CaptureRequest, DomainStore, Record, capture};
//!
//! let store = DomainStore::new("/path/to/cli.jsonl");
//! let outcome = capture(&store, CaptureRequest::new(record))?;
//! ```
//!
//! ## Concurrency caveat
//!
//! Locking is advisory. A process that writes a domain file without going
//! through [`storage::lock::with_lock`] can still corrupt it; this is an
//! accepted trade-off of the cooperative single-host design, not a defect.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod rendering;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{LockSettings, MnemexConfig};
pub use models::{Classification, DomainName, Record, RecordId, RecordKind, RecordRef};
pub use services::{
    AllocationReport, CaptureOutcome, CaptureRequest, CharCostEstimator, CostEstimator,
    DedupDisposition, DomainRecords, RecallRequest, RecallResult, allocate, capture,
    classify_candidate, compact_domain, delete_record, edit_record, find_duplicate, merge, recall,
    resolve, resolve_position, resolve_selector,
};
pub use storage::{DomainRegistry, DomainStore, with_lock};

/// Error type for mnemex operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing required fields, bad domain names, malformed identifiers |
/// | `OperationFailed` | Filesystem I/O errors, serialization failures |
/// | `LockTimeout` | Another process held the domain lock past the acquisition timeout |
/// | `MalformedLine` | A domain file line failed to parse as a record |
/// | `AmbiguousIdentifier` | An identifier prefix matched two or more records |
/// | `RecordNotFound` | An identifier or position matched no record |
/// | `UnknownDomain` | A named domain has no backing file |
/// | `DomainExists` | `domain add` targeted an already-registered domain |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A record is missing a required field (e.g., empty convention content)
    /// - A domain name contains characters outside `[A-Za-z0-9_-]`
    /// - A compaction targets fewer than two records or mixes record kinds
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur (read, write, rename, delete)
    /// - Record serialization fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Lock acquisition timed out.
    ///
    /// Raised when another cooperating process held the domain lock for the
    /// whole acquisition window. If no other mnemex process is actually
    /// running, the lock file is a leftover and can be deleted manually.
    #[error(
        "timed out waiting for lock {}: if no other process is running, \
         delete the lock file and retry", .lock_path.display()
    )]
    LockTimeout {
        /// Path of the contended lock file.
        lock_path: PathBuf,
    },

    /// A domain file line failed to parse.
    ///
    /// Raised when `read_all` encounters invalid JSON or a record shape
    /// violation. The core never skips bad lines silently; tolerant
    /// health-check tooling re-reads line by line itself.
    #[error("malformed record at {}:{line}: {cause}", .path.display())]
    MalformedLine {
        /// Domain file containing the bad line.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Parser error message.
        cause: String,
    },

    /// An identifier prefix matched more than one record.
    #[error("ambiguous identifier '{input}': matches {}", .candidates.join(", "))]
    AmbiguousIdentifier {
        /// The identifier as supplied by the caller.
        input: String,
        /// Every full identifier the prefix matched.
        candidates: Vec<String>,
    },

    /// No record matched the supplied identifier or position.
    #[error("no record matches '{input}' (use the list command to see identifiers)")]
    RecordNotFound {
        /// The identifier as supplied by the caller.
        input: String,
    },

    /// The named domain is not registered.
    #[error("unknown domain '{name}'")]
    UnknownDomain {
        /// The domain name as supplied by the caller.
        name: String,
    },

    /// The domain already exists.
    #[error("domain '{name}' already exists")]
    DomainExists {
        /// The domain name as supplied by the caller.
        name: String,
    },
}

/// Result type alias for mnemex operations.
pub type Result<T> = std::result::Result<T, Error>;
