//! Plain-text rendering of records.
//!
//! One consumer-facing textual form per record, used by the CLI for display
//! and by the default cost estimator. Richer formats (markdown, XML) belong
//! to downstream formatting layers, not here.

use crate::models::{Record, RecordKind};

/// Renders one record as a plain-text block.
///
/// The first line is a header (`[id] kind (classification) date`), followed
/// by the kind-specific body and any tags or links.
#[must_use]
pub fn render_record(record: &Record) -> String {
    let id = record
        .id
        .clone()
        .unwrap_or_else(|| record.identity());
    let mut out = format!(
        "[{id}] {} ({}) {}\n",
        record.kind.tag(),
        record.classification,
        record.recorded_at.format("%Y-%m-%d")
    );

    match &record.kind {
        RecordKind::Convention { content } => {
            out.push_str(content);
            out.push('\n');
        },
        RecordKind::Pattern {
            name,
            description,
            files,
        }
        | RecordKind::Reference {
            name,
            description,
            files,
        } => {
            out.push_str(&format!("{name}: {description}\n"));
            if let Some(files) = files {
                out.push_str(&format!("files: {}\n", files.join(", ")));
            }
        },
        RecordKind::Failure {
            description,
            resolution,
        } => {
            out.push_str(&format!("{description}\n"));
            out.push_str(&format!("resolution: {resolution}\n"));
        },
        RecordKind::Decision { title, rationale } => {
            out.push_str(&format!("{title}: {rationale}\n"));
        },
        RecordKind::Guide { name, description } => {
            out.push_str(&format!("{name}: {description}\n"));
        },
    }

    if let Some(tags) = &record.tags {
        out.push_str(&format!("tags: {}\n", tags.join(", ")));
    }
    if let Some(relates_to) = &record.relates_to {
        let refs: Vec<&str> = relates_to.iter().map(|r| r.as_str()).collect();
        out.push_str(&format!("relates to: {}\n", refs.join(", ")));
    }
    if let Some(supersedes) = &record.supersedes {
        let refs: Vec<&str> = supersedes.iter().map(|r| r.as_str()).collect();
        out.push_str(&format!("supersedes: {}\n", refs.join(", ")));
    }
    out
}

/// Renders a domain heading followed by its records.
#[must_use]
pub fn render_domain(domain: &str, records: &[Record]) -> String {
    let mut out = format!("## {domain}\n\n");
    if records.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }
    for record in records {
        out.push_str(&render_record(record));
        out.push('\n');
    }
    out
}
