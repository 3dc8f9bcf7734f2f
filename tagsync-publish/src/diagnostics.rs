//! Diagnostic events returned by the grouping, spec, and staleness steps.
//!
//! Components never log. They hand these back and the driver aggregates and
//! emits them in order.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use tagsync_core::ArchitectureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An architecture had no source namespace and was left out of the list.
    MissingArchNamespace { arch: ArchitectureId, entry: String },
    /// `repo:tag` was requested, so shared tag groups were not built.
    SharedTagsSkipped { repo: String },
    /// Target tag is at least as new as its sources.
    TagCurrent {
        image: String,
        source_updated: Option<DateTime<Utc>>,
        target_updated: Option<DateTime<Utc>>,
    },
    /// A group is about to be handed to the publisher.
    Publishing { image: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MissingArchNamespace { .. } | Diagnostic::SharedTagsSkipped { .. } => {
                Severity::Warning
            }
            Diagnostic::TagCurrent { .. } | Diagnostic::Publishing { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingArchNamespace { arch, entry } => write!(
                f,
                "no arch-namespace specified for \"{arch}\"; skipping (\"{entry}\")"
            ),
            Diagnostic::SharedTagsSkipped { repo } => write!(
                f,
                "a single tag was requested for {repo} -- skipping shared tags"
            ),
            Diagnostic::TagCurrent {
                image,
                source_updated,
                target_updated,
            } => write!(
                f,
                "Skipping {image} (created {}, last updated {})",
                format_instant(*source_updated),
                format_instant(*target_updated),
            ),
            Diagnostic::Publishing { image } => write!(f, "Putting {image}"),
        }
    }
}

/// RFC 3339 in UTC, or `never` for an absent timestamp.
pub fn format_instant(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => "never".to_string(),
    }
}
