//! Run configuration: `~/.tagsync/config.yaml` plus command-line overrides.
//!
//! # API pattern
//!
//! - `load_at(home)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`
//! - `load_from(path)`: an explicit `--config` file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::ArchNamespaces;

pub const DEFAULT_HUB_URL: &str = "https://hub.docker.com";

/// Settings shared by every tagsync command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default target namespace for `put-shared`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default = "default_library")]
    pub library: PathBuf,
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    #[serde(default)]
    pub arch_namespaces: ArchNamespaces,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: None,
            library: default_library(),
            hub_url: default_hub_url(),
            arch_namespaces: ArchNamespaces::new(),
        }
    }
}

fn default_library() -> PathBuf {
    PathBuf::from("library")
}

fn default_hub_url() -> String {
    DEFAULT_HUB_URL.to_string()
}

/// `<home>/.tagsync/config.yaml` (pure, no I/O).
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".tagsync").join("config.yaml")
}

/// Load the config under `home`; a missing file yields defaults.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    load_at(&home)
}

/// Load an explicit config file; it must exist.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse one `ARCH=NAMESPACE` flag value.
pub fn parse_arch_namespace(value: &str) -> Result<(String, String), ConfigError> {
    match value.split_once('=') {
        Some((arch, ns)) if !arch.is_empty() => Ok((arch.to_owned(), ns.to_owned())),
        _ => Err(ConfigError::InvalidArchNamespace {
            value: value.to_owned(),
        }),
    }
}
