//! Error types for tagsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Raised when an architecture id is not in the supported table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("unsupported architecture '{arch}' slipped past library validation")]
    UnsupportedArchitecture { arch: String },
}

/// Failures while reading a repository out of the library.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Wraps any lower-level failure with the repo that was being fetched.
    #[error("failed fetching repo '{repo}': {source}")]
    RepoFetchFailed {
        repo: String,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and serde_yaml's line context.
    #[error("failed to parse library file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("library file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("library directory not found at {path}")]
    LibraryNotFound { path: PathBuf },

    #[error("entry #{index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("no entry carries tag '{tag}'")]
    UnknownTag { tag: String },
}

/// Failures while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("\"--namespace\" is required for put-shared (or set `namespace` in {path})")]
    MissingNamespace { path: PathBuf },

    #[error("invalid --arch-namespace '{value}': expected ARCH=NAMESPACE")]
    InvalidArchNamespace { value: String },

    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or pass --config")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CatalogError {
    CatalogError::Io {
        path: path.into(),
        source,
    }
}
