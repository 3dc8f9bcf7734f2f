//! Staleness gate: decide which target tags of a group need a new push.
//!
//! A tag is pushed only when the newest source image is strictly newer than
//! what the target tag currently points at. An absent target orders below
//! every instant. Equal instants, including "both unknown", are left alone.

use chrono::{DateTime, Utc};

use tagsync_core::TagGroup;

use crate::diagnostics::Diagnostic;
use crate::hub::TagMetaSource;

/// A target tag left untouched because it is already current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTag {
    pub tag: String,
    pub image: String,
    pub source_updated: Option<DateTime<Utc>>,
    pub target_updated: Option<DateTime<Utc>>,
}

impl SkippedTag {
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::TagCurrent {
            image: self.image.clone(),
            source_updated: self.source_updated,
            target_updated: self.target_updated,
        }
    }
}

/// Partition of a group's shared tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateOutcome {
    /// Tags to push, in shared-tag order.
    pub publish: Vec<String>,
    pub skipped: Vec<SkippedTag>,
}

impl GateOutcome {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.skipped.iter().map(SkippedTag::diagnostic).collect()
    }
}

pub fn needs_publish(
    source_updated: Option<DateTime<Utc>>,
    target_updated: Option<DateTime<Utc>>,
) -> bool {
    source_updated > target_updated
}

/// Check every shared tag of `group` under `target_repo`.
pub fn gate<M: TagMetaSource + ?Sized>(
    group: &TagGroup<'_>,
    target_repo: &str,
    most_recent_update: Option<DateTime<Utc>>,
    meta: &M,
) -> GateOutcome {
    let mut outcome = GateOutcome::default();
    for tag in group.shared_tags() {
        let image = format!("{target_repo}:{tag}");
        let target_updated = meta.fetch_tag_meta(&image).last_updated;
        if needs_publish(most_recent_update, target_updated) {
            outcome.publish.push(tag.clone());
        } else {
            outcome.skipped.push(SkippedTag {
                tag: tag.clone(),
                image,
                source_updated: most_recent_update,
                target_updated,
            });
        }
    }
    outcome
}
