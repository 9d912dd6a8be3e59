//! Record types, classification tiers, and content-addressed identity.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::LazyLock;

/// Shape of an assigned identifier: `mx-` plus six lowercase hex digits.
///
/// The pattern is a verified literal; the `unreachable!()` branch exists
/// only for type checking.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^mx-[0-9a-f]{6}$").unwrap_or_else(|_| unreachable!()));

/// Unique identifier for a record.
///
/// Identifiers are content-derived: two records of the same kind with the
/// same key field always carry the same identifier. That collision is the
/// deduplication key, so an identifier is a handle, not a uniqueness proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `s` has the assigned-identifier shape.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        ID_PATTERN.is_match(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Expected lifespan tier of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Durable, cross-cutting knowledge that never goes stale.
    Foundational,
    /// Situation-specific knowledge with a limited shelf life.
    #[default]
    Tactical,
    /// Raw observations, the first to be dropped under budget pressure.
    Observational,
}

impl Classification {
    /// Returns all classification variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Foundational, Self::Tactical, Self::Observational]
    }

    /// Returns the classification as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Foundational => "foundational",
            Self::Tactical => "tactical",
            Self::Observational => "observational",
        }
    }

    /// Parses a classification from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "foundational" => Some(Self::Foundational),
            "tactical" => Some(Self::Tactical),
            "observational" => Some(Self::Observational),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload of a record, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordKind {
    /// A rule or convention the codebase follows.
    Convention {
        /// The convention text. Identity and dedup key.
        content: String,
    },
    /// A recurring implementation pattern.
    Pattern {
        /// Pattern name. Identity and dedup key.
        name: String,
        /// What the pattern is and when to apply it.
        description: String,
        /// Files that exemplify the pattern.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        files: Option<Vec<String>>,
    },
    /// Something that went wrong and how it was resolved.
    Failure {
        /// What failed. Identity and dedup key.
        description: String,
        /// How it was fixed or worked around.
        resolution: String,
    },
    /// A recorded decision with its rationale.
    Decision {
        /// Decision title. Identity and dedup key.
        title: String,
        /// Why the decision was made.
        rationale: String,
    },
    /// A pointer to external or internal material.
    Reference {
        /// Reference name. Identity and dedup key.
        name: String,
        /// What the reference covers.
        description: String,
        /// Related files.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        files: Option<Vec<String>>,
    },
    /// A how-to guide.
    Guide {
        /// Guide name. Identity and dedup key.
        name: String,
        /// What the guide walks through.
        description: String,
    },
}

impl RecordKind {
    /// Returns all kind tags.
    #[must_use]
    pub const fn all_tags() -> &'static [&'static str] {
        &[
            "convention",
            "pattern",
            "failure",
            "decision",
            "reference",
            "guide",
        ]
    }

    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Convention { .. } => "convention",
            Self::Pattern { .. } => "pattern",
            Self::Failure { .. } => "failure",
            Self::Decision { .. } => "decision",
            Self::Reference { .. } => "reference",
            Self::Guide { .. } => "guide",
        }
    }

    /// Returns the identity key field for this kind.
    ///
    /// The key field alone determines the record's identifier and its
    /// duplicate matches; all other fields are ignored for identity.
    #[must_use]
    pub fn key_field(&self) -> &str {
        match self {
            Self::Convention { content } => content,
            Self::Pattern { name, .. } | Self::Reference { name, .. } | Self::Guide { name, .. } => {
                name
            },
            Self::Failure { description, .. } => description,
            Self::Decision { title, .. } => title,
        }
    }

    /// Returns true for kinds whose key field is a name or title.
    ///
    /// Named kinds upsert in place on a duplicate match; content-identity
    /// kinds (`convention`, `failure`) skip the incoming duplicate instead.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(
            self,
            Self::Pattern { .. } | Self::Decision { .. } | Self::Reference { .. } | Self::Guide { .. }
        )
    }
}

/// One structured expertise note.
///
/// Serialized as a single JSON object per domain-file line. The `type`
/// discriminant and kind-specific fields sit at the top level next to the
/// common fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Kind-specific payload (flattened onto the same JSON object).
    #[serde(flatten)]
    pub kind: RecordKind,
    /// Lifespan tier.
    pub classification: Classification,
    /// When the record was captured (or merged), UTC.
    pub recorded_at: DateTime<Utc>,
    /// Assigned identifier. Filled in by the store on first write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Free-form tags, stored in the order supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Links to related records, same-domain or `<domain>:<id>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<Vec<super::RecordRef>>,
    /// Records this one replaced (set by compaction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<Vec<super::RecordRef>>,
}

impl Record {
    /// Creates a record with the given payload and classification.
    ///
    /// `recorded_at` is set to now; identifier, tags, and links start empty.
    #[must_use]
    pub fn new(kind: RecordKind, classification: Classification) -> Self {
        Self {
            kind,
            classification,
            recorded_at: Utc::now(),
            id: None,
            tags: None,
            relates_to: None,
            supersedes: None,
        }
    }

    /// Computes the deterministic content-derived identifier.
    ///
    /// The identifier is `mx-` plus the first six hex digits of the SHA-256
    /// of the kind's key field. It depends on nothing else: classification,
    /// timestamp, and secondary fields never change it.
    #[must_use]
    pub fn identity(&self) -> RecordId {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.key_field().as_bytes());
        let digest = hex::encode(hasher.finalize());
        RecordId::new(format!("mx-{}", &digest[..6]))
    }

    /// Fills in the identifier if the record lacks one.
    pub fn assign_id(&mut self) {
        if self.id.is_none() {
            self.id = Some(self.identity());
        }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}
