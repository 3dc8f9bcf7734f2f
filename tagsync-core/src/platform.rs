//! Architecture → platform resolution and per-architecture source namespaces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::types::{ArchitectureId, PlatformTriple};

/// `(id, os, architecture, variant)` for every architecture the library may declare.
const SUPPORTED: &[(&str, &str, &str, Option<&str>)] = &[
    ("amd64", "linux", "amd64", None),
    ("arm32v5", "linux", "arm", Some("v5")),
    ("arm32v6", "linux", "arm", Some("v6")),
    ("arm32v7", "linux", "arm", Some("v7")),
    ("arm64", "linux", "arm64", None),
    ("arm64v8", "linux", "arm64", Some("v8")),
    ("i386", "linux", "386", None),
    ("mips64le", "linux", "mips64le", None),
    ("ppc64le", "linux", "ppc64le", None),
    ("riscv64", "linux", "riscv64", None),
    ("s390x", "linux", "s390x", None),
    ("windows-amd64", "windows", "amd64", None),
];

/// Resolve an architecture id to its platform triple.
///
/// An unknown id means the library validation was bypassed; callers treat
/// the error as fatal.
pub fn resolve(arch: &ArchitectureId) -> Result<PlatformTriple, PlatformError> {
    SUPPORTED
        .iter()
        .find(|(id, ..)| *id == arch.as_str())
        .map(|(_, os, architecture, variant)| PlatformTriple {
            os: (*os).to_owned(),
            architecture: (*architecture).to_owned(),
            variant: variant.map(str::to_owned),
        })
        .ok_or_else(|| PlatformError::UnsupportedArchitecture {
            arch: arch.to_string(),
        })
}

/// All supported architecture ids, in table order.
pub fn supported_architectures() -> impl Iterator<Item = &'static str> {
    SUPPORTED.iter().map(|(id, ..)| *id)
}

/// Registry namespace each architecture's single-arch images are pulled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchNamespaces(BTreeMap<String, String>);

impl ArchNamespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: ArchNamespaces) {
        self.0.extend(other.0);
    }

    /// `None` when the architecture has no namespace (or an empty one).
    pub fn namespace_for(&self, arch: &ArchitectureId) -> Option<&str> {
        self.0
            .get(arch.as_str())
            .map(String::as_str)
            .filter(|ns| !ns.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArchNamespaces {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
