//! Domain names and cross-domain record references.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated domain name.
///
/// Domain names become file names, so only alphanumerics, dashes, and
/// underscores are accepted. This also rules out path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Parses and validates a domain name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the name is empty, longer than 255
    /// characters, or contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(name: &str) -> Result<Self> {
        if Self::is_safe_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidInput(format!(
                "domain name must be non-empty alphanumeric with '-' or '_': {name}"
            )))
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the file name backing this domain.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.jsonl", self.0)
    }

    /// Checks if a name is safe to use as a file name (no path traversal).
    fn is_safe_name(name: &str) -> bool {
        // Only allow alphanumeric, dash, underscore
        // Reject: .. / \ NUL and other special chars
        !name.is_empty()
            && name.len() <= 255
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to another record, same-domain or cross-domain.
///
/// Wire format is either a bare identifier (`mx-1a2b3c`) or
/// `<domain>:<identifier>` for cross-domain links. Stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRef(String);

impl RecordRef {
    /// Creates a reference from its wire form.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Creates a same-domain reference to an identifier.
    #[must_use]
    pub fn local(id: &super::RecordId) -> Self {
        Self(id.as_str().to_string())
    }

    /// Creates a cross-domain reference.
    #[must_use]
    pub fn cross(domain: &DomainName, id: &super::RecordId) -> Self {
        Self(format!("{}:{}", domain.as_str(), id.as_str()))
    }

    /// Returns the raw wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part, if this is a cross-domain reference.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once(':').map(|(domain, _)| domain)
    }

    /// Returns the identifier part.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0
            .split_once(':')
            .map_or(self.0.as_str(), |(_, id)| id)
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
