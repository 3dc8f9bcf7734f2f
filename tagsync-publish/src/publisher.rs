//! Publish collaborators: hand a finished [`PublishSpec`] to something that
//! performs the multi-architecture push.

use std::io::Write;
use std::process::Command;

use crate::error::{io_err, PublisherError};
use crate::spec::PublishSpec;

pub trait Publisher {
    /// Push one manifest list. All-or-nothing: there is no partial result.
    fn publish(&mut self, spec: &PublishSpec) -> Result<(), PublisherError>;
}

/// Runs `manifest-tool push from-spec` on a temporary copy of the document.
#[derive(Debug, Clone)]
pub struct ManifestTool {
    program: String,
    debug: bool,
}

impl Default for ManifestTool {
    fn default() -> Self {
        Self::new("manifest-tool")
    }
}

impl ManifestTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Arguments passed to the tool for a spec file at `spec_path`.
    pub fn args(&self, spec_path: &str) -> Vec<String> {
        let mut args = Vec::new();
        if self.debug {
            args.push("--debug".to_string());
        }
        args.extend(
            ["push", "from-spec", "--ignore-missing", spec_path]
                .into_iter()
                .map(str::to_owned),
        );
        args
    }
}

impl Publisher for ManifestTool {
    fn publish(&mut self, spec: &PublishSpec) -> Result<(), PublisherError> {
        let mut file = tempfile::Builder::new()
            .prefix("tagsync-manifest-tool-")
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| io_err(std::env::temp_dir(), e))?;
        file.write_all(spec.to_manifest_yaml().as_bytes())
            .map_err(|e| io_err(file.path(), e))?;
        file.flush().map_err(|e| io_err(file.path(), e))?;

        let args = self.args(&file.path().to_string_lossy());
        if self.debug {
            tracing::debug!("$ {} {:?}", self.program, args);
        }
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| PublisherError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(PublisherError::Exit {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Accepts every spec without pushing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl Publisher for DryRun {
    fn publish(&mut self, spec: &PublishSpec) -> Result<(), PublisherError> {
        tracing::debug!(
            "[dry-run] would push {}:\n{}",
            spec.canonical_image(),
            spec.to_manifest_yaml()
        );
        Ok(())
    }
}
