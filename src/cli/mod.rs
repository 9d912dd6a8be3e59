//! CLI argument shapes and helpers.
//!
//! The binary in `main.rs` owns parsing and output; this module holds the
//! reusable argument structs and the pure record-building logic behind
//! them, so the mapping from flags to a [`crate::models::Record`] stays
//! testable without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `domain add` / `domain list` | Manage registered domains |
//! | `record` | Capture a record (dedup/upsert applies) |
//! | `show` | Print one record by id, prefix, or position |
//! | `edit` | Replace a record in place |
//! | `delete` | Remove a record |
//! | `compact` | Merge records into one consolidated record |
//! | `recall` | Read records across domains, optionally within a budget |
//! | `status` | Per-domain record counts |
//! | `completions` | Generate shell completions |

mod record;

pub use record::{ClassificationArg, KindArg, RecordArgs};

use crate::Result;
use crate::models::DomainName;

/// Parses and validates a list of domain-name arguments.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for the first invalid name.
pub fn parse_domains(names: &[String]) -> Result<Vec<DomainName>> {
    names.iter().map(|name| DomainName::parse(name)).collect()
}
