//! Data models for mnemex.
//!
//! This module contains the core data structures used throughout the system.

mod domain;
mod record;

pub use domain::{DomainName, RecordRef};
pub use record::{Classification, Record, RecordId, RecordKind};
