//! `tagsync put-shared`: push manifest lists for stale tag groups.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use tagsync_core::{config, ArchNamespaces, ConfigError, Library};
use tagsync_publish::{
    DryRun, HubClient, ManifestTool, Publisher, PublishDriver, RepoScope, RunReport,
};

use crate::GlobalArgs;

/// Arguments for `tagsync put-shared`.
#[derive(Args, Debug)]
pub struct PutSharedArgs {
    /// Target namespace to publish into (e.g. `myorg`).
    #[arg(long)]
    pub namespace: Option<String>,

    /// Repos to process, as `repo` or `repo:tag` (omit when using `--all`).
    pub repos: Vec<String>,

    /// Process every repo in the library.
    #[arg(long, conflicts_with = "repos")]
    pub all: bool,

    /// Source namespace for an architecture, as `ARCH=NAMESPACE` (repeatable).
    #[arg(long = "arch-namespace", value_name = "ARCH=NAMESPACE")]
    pub arch_namespaces: Vec<String>,

    /// Path to the manifest-tool binary.
    #[arg(long, default_value = "manifest-tool")]
    pub manifest_tool: String,

    /// Check staleness and print the documents without pushing.
    #[arg(long)]
    pub dry_run: bool,
}

impl PutSharedArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let cfg = global.load_config()?;

        let namespace = self
            .namespace
            .clone()
            .or_else(|| cfg.namespace.clone())
            .filter(|ns| !ns.is_empty());
        let Some(namespace) = namespace else {
            let path = match &global.config {
                Some(path) => path.clone(),
                None => dirs::home_dir()
                    .map(|home| config::config_path_at(&home))
                    .unwrap_or_else(|| "~/.tagsync/config.yaml".into()),
            };
            return Err(ConfigError::MissingNamespace { path }.into());
        };

        let overrides = self
            .arch_namespaces
            .iter()
            .map(|value| config::parse_arch_namespace(value))
            .collect::<Result<ArchNamespaces, ConfigError>>()?;
        let mut arch_namespaces = cfg.arch_namespaces.clone();
        arch_namespaces.merge(overrides);

        let scope = if self.all {
            RepoScope::All
        } else if self.repos.is_empty() {
            bail!("provide at least one repo or use --all");
        } else {
            RepoScope::Named(self.repos.clone())
        };

        let library = Library::new(&cfg.library);
        let meta = HubClient::new(cfg.hub_url.clone());

        if self.dry_run {
            let mut driver = PublishDriver::new(namespace, arch_namespaces, meta, DryRun);
            let report = execute(&mut driver, &library, &scope)?;
            print_report(&report, true);
        } else {
            let tool = ManifestTool::new(self.manifest_tool.clone()).with_debug(global.debug);
            let mut driver = PublishDriver::new(namespace, arch_namespaces, meta, tool);
            let report = execute(&mut driver, &library, &scope)?;
            print_report(&report, false);
        }
        Ok(())
    }
}

fn execute<P: Publisher>(
    driver: &mut PublishDriver<HubClient, P>,
    library: &Library,
    scope: &RepoScope,
) -> Result<RunReport> {
    driver
        .run_scope(library, scope)
        .context("put-shared failed")
}

fn print_report(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for group in &report.groups {
        let Some(spec) = &group.spec else {
            println!("{prefix}{} {} (current)", "·".bright_black(), group.group);
            continue;
        };
        println!(
            "{prefix}{} {} ({})",
            "✎".green(),
            spec.canonical_image(),
            group.published.join(", ")
        );
        if dry_run {
            for line in spec.to_manifest_yaml().lines() {
                println!("    {line}");
            }
        }
    }

    let warnings = report.warnings().count();
    let summary = format!(
        "{prefix}{} group(s) pushed, {} tag(s) current, {} warning(s)",
        report.published_count(),
        report.groups.iter().map(|g| g.skipped.len()).sum::<usize>(),
        warnings,
    );
    if warnings > 0 {
        println!("{}", summary.yellow());
    } else {
        println!("{summary}");
    }
}
