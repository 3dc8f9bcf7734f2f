//! Domain types shared by the catalog, the spec generator, and the publisher.
//!
//! Everything here is loaded once per invocation and never mutated. Groups,
//! specs, and remote metadata are rebuilt on every pass.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An architecture token as written in the library (`"amd64"`, `"arm32v7"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchitectureId(pub String);

impl ArchitectureId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchitectureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArchitectureId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArchitectureId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Platforms and image references
// ---------------------------------------------------------------------------

/// OS / architecture / variant descriptor attached to a manifest-list member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTriple {
    pub os: String,
    pub architecture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl fmt::Display for PlatformTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)?;
        if let Some(variant) = &self.variant {
            write!(f, "/{variant}")?;
        }
        Ok(())
    }
}

/// One single-architecture image used as a manifest-list member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchImageRef {
    pub namespace: String,
    pub repo_name: String,
    pub tag: String,
}

impl fmt::Display for ArchImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.namespace, self.repo_name, self.tag)
    }
}

/// Snapshot of what the registry reported for one image reference.
///
/// `None` means the tag was never published (or could not be looked up) and
/// orders below every real instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RemoteTagMeta {
    pub last_updated: Option<DateTime<Utc>>,
}

impl RemoteTagMeta {
    pub fn absent() -> Self {
        Self { last_updated: None }
    }

    pub fn updated_at(at: DateTime<Utc>) -> Self {
        Self {
            last_updated: Some(at),
        }
    }

    pub fn is_present(&self) -> bool {
        self.last_updated.is_some()
    }
}

// ---------------------------------------------------------------------------
// Catalog structs
// ---------------------------------------------------------------------------

/// One buildable unit of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_tags: Vec<String>,
    pub architectures: Vec<ArchitectureId>,
}

impl Entry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_shared_tag(&self, tag: &str) -> bool {
        self.shared_tags.iter().any(|t| t == tag)
    }
}

/// A named repository and its entries, as handed over by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub name: String,
    pub entries: Vec<Entry>,
    /// Set when the caller asked for `repo:tag` rather than the whole repo.
    pub tag_name: Option<String>,
}

impl Repo {
    /// Entries in declaration order, narrowed to the requested tag if any.
    pub fn entries(&self) -> Vec<&Entry> {
        match &self.tag_name {
            Some(tag) => self.entries.iter().filter(|e| e.has_tag(tag)).collect(),
            None => self.entries.iter().collect(),
        }
    }

    /// `repo:firstTag`, used to name an entry in diagnostics and errors.
    pub fn entry_identifier(&self, entry: &Entry) -> String {
        match entry.tags.first() {
            Some(tag) => format!("{}:{tag}", self.name),
            None => self.name.clone(),
        }
    }

    /// Every shared tag across all entries, first-seen order, deduplicated.
    pub fn all_shared_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for entry in &self.entries {
            for tag in &entry.shared_tags {
                if !tags.contains(&tag.as_str()) {
                    tags.push(tag);
                }
            }
        }
        tags
    }

    /// Shared tags grouped by the exact set of entries that declare them.
    ///
    /// Groups appear in the order their first tag was seen; entries inside a
    /// group keep declaration order.
    pub fn shared_tag_groups(&self) -> Vec<(Vec<String>, Vec<&Entry>)> {
        let mut groups: Vec<(Vec<usize>, Vec<String>)> = Vec::new();
        for tag in self.all_shared_tags() {
            let members: Vec<usize> = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_shared_tag(tag))
                .map(|(i, _)| i)
                .collect();
            match groups.iter_mut().find(|(key, _)| *key == members) {
                Some((_, tags)) => tags.push(tag.to_owned()),
                None => groups.push((members, vec![tag.to_owned()])),
            }
        }
        groups
            .into_iter()
            .map(|(members, tags)| (tags, members.into_iter().map(|i| &self.entries[i]).collect()))
            .collect()
    }
}

/// Tags that must always point at the same manifest list, plus the entries
/// backing its members. The first tag is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup<'a> {
    shared_tags: Vec<String>,
    entries: Vec<&'a Entry>,
}

impl<'a> TagGroup<'a> {
    /// Returns `None` if either `shared_tags` or `entries` is empty.
    pub fn new(shared_tags: Vec<String>, entries: Vec<&'a Entry>) -> Option<Self> {
        if shared_tags.is_empty() || entries.is_empty() {
            return None;
        }
        Some(Self {
            shared_tags,
            entries,
        })
    }

    pub fn canonical_tag(&self) -> &str {
        &self.shared_tags[0]
    }

    pub fn shared_tags(&self) -> &[String] {
        &self.shared_tags
    }

    pub fn entries(&self) -> &[&'a Entry] {
        &self.entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
