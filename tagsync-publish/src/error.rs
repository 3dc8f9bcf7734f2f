//! Error types for tagsync-publish.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use tagsync_core::{CatalogError, PlatformError};

/// Fatal failures of a put-shared run. Every variant aborts the whole run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Entries name their images by their first tag, so one is required.
    #[error("entry #{index} of {repo} has no tags")]
    UntaggedEntry { repo: String, index: usize },

    /// Every architecture of every entry in the group was unpublishable.
    #[error("failed gathering images for creating {entries:?}")]
    NoPublishableMembers { entries: Vec<String> },

    #[error("failed pushing {image}: {source}")]
    PublishFailed {
        image: String,
        #[source]
        source: PublisherError,
    },
}

/// Failures reported by a [`Publisher`](crate::publisher::Publisher).
#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },

    /// Free-form failure from a custom publisher.
    #[error("{0}")]
    Other(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublisherError {
    PublisherError::Io {
        path: path.into(),
        source,
    }
}
