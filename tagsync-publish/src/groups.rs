//! Tag group construction.
//!
//! Every entry gets its own group first, so each multi-arch entry is pushed
//! even when it takes part in no shared tag. Shared tag groups follow, unless
//! the repo was narrowed to a single tag.

use tagsync_core::{Repo, TagGroup};

use crate::diagnostics::Diagnostic;
use crate::error::PublishError;

/// Groups for one repo, in publish order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoGroups<'a> {
    pub groups: Vec<TagGroup<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fails with [`PublishError::UntaggedEntry`] rather than leave an entry
/// without a group.
pub fn build_groups(repo: &Repo) -> Result<RepoGroups<'_>, PublishError> {
    let mut groups = Vec::new();
    for (index, entry) in repo.entries().into_iter().enumerate() {
        let group = TagGroup::new(entry.tags.clone(), vec![entry]).ok_or_else(|| {
            PublishError::UntaggedEntry {
                repo: repo.name.clone(),
                index,
            }
        })?;
        groups.push(group);
    }
    let mut diagnostics = Vec::new();

    if repo.tag_name.is_none() {
        groups.extend(
            repo.shared_tag_groups()
                .into_iter()
                .filter_map(|(tags, entries)| TagGroup::new(tags, entries)),
        );
    } else {
        diagnostics.push(Diagnostic::SharedTagsSkipped {
            repo: repo.name.clone(),
        });
    }

    Ok(RepoGroups {
        groups,
        diagnostics,
    })
}
