//! YAML library of image repositories.
//!
//! # Storage layout
//!
//! ```text
//! <library>/
//!   <repo>.yaml   (one file per repository)
//! ```
//!
//! Each file holds an `entries:` list. Loading validates what the publishing
//! pipeline relies on: every entry has at least one tag and one architecture,
//! and every architecture is in the supported table.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{io_err, CatalogError};
use crate::platform;
use crate::types::{Entry, Repo};

#[derive(Debug, Deserialize)]
struct RepoFile {
    #[serde(default)]
    entries: Vec<Entry>,
}

/// A directory of `<repo>.yaml` files.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<library>/<repo>.yaml` (pure, no I/O).
    pub fn repo_path(&self, repo: &str) -> PathBuf {
        self.root.join(format!("{repo}.yaml"))
    }

    /// Fetch `repo` or `repo:tag`.
    ///
    /// Any failure is wrapped in [`CatalogError::RepoFetchFailed`] naming the
    /// requested repo.
    pub fn fetch(&self, name: &str) -> Result<Repo, CatalogError> {
        self.fetch_inner(name)
            .map_err(|e| CatalogError::RepoFetchFailed {
                repo: name.to_owned(),
                source: Box::new(e),
            })
    }

    /// Fetch every repo in the library, sorted by name.
    pub fn fetch_all(&self) -> Result<Vec<Repo>, CatalogError> {
        self.repo_names()?
            .iter()
            .map(|name| self.fetch(name))
            .collect()
    }

    /// Fetch each named repo in the order given.
    pub fn fetch_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Repo>, CatalogError> {
        names.iter().map(|name| self.fetch(name.as_ref())).collect()
    }

    /// Names of every `*.yaml` file in the library, sorted.
    pub fn repo_names(&self) -> Result<Vec<String>, CatalogError> {
        if !self.root.is_dir() {
            return Err(CatalogError::LibraryNotFound {
                path: self.root.clone(),
            });
        }
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .map_err(|e| io_err(&self.root, e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| {
                let fname = e.file_name().to_string_lossy().into_owned();
                fname.strip_suffix(".yaml").map(str::to_owned)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn fetch_inner(&self, name: &str) -> Result<Repo, CatalogError> {
        let (repo_name, tag_name) = match name.split_once(':') {
            Some((repo, tag)) => (repo, Some(tag.to_owned())),
            None => (name, None),
        };

        let path = self.repo_path(repo_name);
        if !path.exists() {
            return Err(CatalogError::NotFound { path });
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let file: RepoFile =
            serde_yaml::from_str(&contents).map_err(|e| CatalogError::Parse { path, source: e })?;

        validate_entries(&file.entries)?;

        let repo = Repo {
            name: repo_name.to_owned(),
            entries: file.entries,
            tag_name,
        };
        if let Some(tag) = &repo.tag_name {
            if repo.entries().is_empty() {
                return Err(CatalogError::UnknownTag { tag: tag.clone() });
            }
        }
        Ok(repo)
    }
}

fn validate_entries(entries: &[Entry]) -> Result<(), CatalogError> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.tags.is_empty() {
            return Err(CatalogError::InvalidEntry {
                index,
                reason: "no tags".to_string(),
            });
        }
        if entry.architectures.is_empty() {
            return Err(CatalogError::InvalidEntry {
                index,
                reason: format!("'{}' declares no architectures", entry.tags[0]),
            });
        }
        for arch in &entry.architectures {
            platform::resolve(arch)?;
        }
    }
    Ok(())
}
