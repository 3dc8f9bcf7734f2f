//! tagsync core library: domain types, architecture table, library catalog,
//! configuration, errors.
//!
//! - [`types`]: repos, entries, tag groups, image references
//! - [`platform`]: architecture → platform triple, per-arch namespaces
//! - [`catalog`]: YAML library loading
//! - [`config`]: `~/.tagsync/config.yaml`
//! - [`error`]: [`CatalogError`], [`ConfigError`], [`PlatformError`]

pub mod catalog;
pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use catalog::Library;
pub use config::Config;
pub use error::{CatalogError, ConfigError, PlatformError};
pub use platform::ArchNamespaces;
pub use types::{
    ArchImageRef, ArchitectureId, Entry, PlatformTriple, RemoteTagMeta, Repo, TagGroup,
};
