//! Flag-to-record mapping for the `record` and `edit` commands.

use crate::models::{Classification, Record, RecordKind, RecordRef};
use crate::{Error, Result};
use clap::{Args, ValueEnum};

/// Record kind selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// A rule the codebase follows.
    Convention,
    /// A recurring implementation pattern.
    Pattern,
    /// Something that went wrong and its resolution.
    Failure,
    /// A recorded decision with rationale.
    Decision,
    /// A pointer to other material.
    Reference,
    /// A how-to guide.
    Guide,
}

impl KindArg {
    /// Lowercase tag, matching the wire discriminant.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Convention => "convention",
            Self::Pattern => "pattern",
            Self::Failure => "failure",
            Self::Decision => "decision",
            Self::Reference => "reference",
            Self::Guide => "guide",
        }
    }
}

/// Classification selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassificationArg {
    /// Durable, cross-cutting knowledge.
    Foundational,
    /// Situation-specific knowledge.
    Tactical,
    /// Raw observations.
    Observational,
}

impl From<ClassificationArg> for Classification {
    fn from(arg: ClassificationArg) -> Self {
        match arg {
            ClassificationArg::Foundational => Self::Foundational,
            ClassificationArg::Tactical => Self::Tactical,
            ClassificationArg::Observational => Self::Observational,
        }
    }
}

/// Flags describing one record.
///
/// Which field flags are required depends on `--kind`; [`RecordArgs::build`]
/// enforces that and reports the missing flag by name.
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Record kind.
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Lifespan tier.
    #[arg(long, value_enum, default_value = "tactical")]
    pub classification: ClassificationArg,

    /// Convention text.
    #[arg(long)]
    pub content: Option<String>,

    /// Name (pattern, reference, guide).
    #[arg(long)]
    pub name: Option<String>,

    /// Description (pattern, failure, reference, guide).
    #[arg(long)]
    pub description: Option<String>,

    /// Decision title.
    #[arg(long)]
    pub title: Option<String>,

    /// Decision rationale.
    #[arg(long)]
    pub rationale: Option<String>,

    /// Failure resolution.
    #[arg(long)]
    pub resolution: Option<String>,

    /// Exemplifying files, comma-separated (pattern, reference).
    #[arg(long)]
    pub files: Option<String>,

    /// Tags, comma-separated.
    #[arg(long)]
    pub tags: Option<String>,

    /// Related records, comma-separated (`id` or `domain:id`).
    #[arg(long)]
    pub relates_to: Option<String>,
}

impl RecordArgs {
    /// Builds a record from the flags.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first missing required
    /// flag for the chosen kind.
    pub fn build(&self) -> Result<Record> {
        let kind = match self.kind {
            KindArg::Convention => RecordKind::Convention {
                content: self.require("content", self.content.as_ref())?,
            },
            KindArg::Pattern => RecordKind::Pattern {
                name: self.require("name", self.name.as_ref())?,
                description: self.require("description", self.description.as_ref())?,
                files: split_list(self.files.as_ref()),
            },
            KindArg::Failure => RecordKind::Failure {
                description: self.require("description", self.description.as_ref())?,
                resolution: self.require("resolution", self.resolution.as_ref())?,
            },
            KindArg::Decision => RecordKind::Decision {
                title: self.require("title", self.title.as_ref())?,
                rationale: self.require("rationale", self.rationale.as_ref())?,
            },
            KindArg::Reference => RecordKind::Reference {
                name: self.require("name", self.name.as_ref())?,
                description: self.require("description", self.description.as_ref())?,
                files: split_list(self.files.as_ref()),
            },
            KindArg::Guide => RecordKind::Guide {
                name: self.require("name", self.name.as_ref())?,
                description: self.require("description", self.description.as_ref())?,
            },
        };

        let mut record = Record::new(kind, self.classification.into());
        record.tags = split_list(self.tags.as_ref());
        record.relates_to = split_list(self.relates_to.as_ref())
            .map(|refs| refs.into_iter().map(RecordRef::new).collect());
        Ok(record)
    }

    fn require(&self, field: &str, value: Option<&String>) -> Result<String> {
        value.cloned().ok_or_else(|| {
            Error::InvalidInput(format!(
                "--{field} is required for kind '{}'",
                self.kind.tag()
            ))
        })
    }
}

/// Splits a comma-separated flag into a non-empty list.
fn split_list(value: Option<&String>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: KindArg) -> RecordArgs {
        RecordArgs {
            kind,
            classification: ClassificationArg::Tactical,
            content: None,
            name: None,
            description: None,
            title: None,
            rationale: None,
            resolution: None,
            files: None,
            tags: None,
            relates_to: None,
        }
    }

    #[test]
    fn test_build_convention() {
        let mut a = args(KindArg::Convention);
        a.content = Some("always pin versions".to_string());
        a.tags = Some("deps, ci".to_string());

        let record = a.build().unwrap();
        assert_eq!(record.kind.tag(), "convention");
        assert_eq!(
            record.tags,
            Some(vec!["deps".to_string(), "ci".to_string()])
        );
    }

    #[test]
    fn test_build_names_missing_flag() {
        let mut a = args(KindArg::Decision);
        a.title = Some("Use JSONL".to_string());

        let err = a.build().unwrap_err();
        assert!(err.to_string().contains("--rationale"));
        assert!(err.to_string().contains("decision"));
    }

    #[test]
    fn test_build_pattern_with_files_and_refs() {
        let mut a = args(KindArg::Pattern);
        a.name = Some("locked mutate".to_string());
        a.description = Some("read, modify, replace under lock".to_string());
        a.files = Some("src/storage/store.rs".to_string());
        a.relates_to = Some("mx-aaaaaa, api:mx-bbbbbb".to_string());

        let record = a.build().unwrap();
        let refs = record.relates_to.unwrap();
        assert_eq!(refs[1].domain(), Some("api"));
    }

    #[test]
    fn test_empty_list_flags_collapse_to_none() {
        let mut a = args(KindArg::Convention);
        a.content = Some("x".to_string());
        a.tags = Some(" , ".to_string());
        let record = a.build().unwrap();
        assert_eq!(record.tags, None);
    }
}
