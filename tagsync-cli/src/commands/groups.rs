//! `tagsync groups`: offline view of the tag groups put-shared would use.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tagsync_core::{Library, Repo};
use tagsync_publish::{groups::build_groups, Diagnostic};

use crate::GlobalArgs;

/// Arguments for `tagsync groups`.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Repos to show, as `repo` or `repo:tag` (omit when using `--all`).
    pub repos: Vec<String>,

    /// Show every repo in the library.
    #[arg(long, conflicts_with = "repos")]
    pub all: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl GroupsArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let cfg = global.load_config()?;
        let library = Library::new(&cfg.library);

        if !self.all && self.repos.is_empty() {
            bail!("provide at least one repo or use --all");
        }
        let repos = if self.all {
            library.fetch_all()
        } else {
            library.fetch_many(self.repos.as_slice())
        };
        let repos = repos.context("failed to load library")?;

        let rows = collect_rows(&repos)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize groups JSON")?
            );
            return Ok(());
        }
        print_table(rows);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RepoGroupsJson {
    repo: String,
    groups: Vec<GroupJson>,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GroupJson {
    tags: Vec<String>,
    entries: Vec<String>,
    architectures: Vec<String>,
}

#[derive(Tabled)]
struct GroupTableRow {
    #[tabled(rename = "tags")]
    tags: String,
    #[tabled(rename = "entries")]
    entries: String,
    #[tabled(rename = "architectures")]
    architectures: String,
}

fn collect_rows(repos: &[Repo]) -> Result<Vec<RepoGroupsJson>> {
    repos
        .iter()
        .map(|repo| -> Result<RepoGroupsJson> {
            let plan = build_groups(repo)?;
            let groups = plan
                .groups
                .iter()
                .map(|group| {
                    let mut architectures: Vec<String> = Vec::new();
                    for entry in group.entries() {
                        for arch in &entry.architectures {
                            if !architectures.iter().any(|a| a == arch.as_str()) {
                                architectures.push(arch.to_string());
                            }
                        }
                    }
                    GroupJson {
                        tags: group.shared_tags().to_vec(),
                        entries: group
                            .entries()
                            .iter()
                            .map(|e| repo.entry_identifier(e))
                            .collect(),
                        architectures,
                    }
                })
                .collect();
            Ok(RepoGroupsJson {
                repo: repo.name.clone(),
                groups,
                warnings: plan.diagnostics.iter().map(Diagnostic::to_string).collect(),
            })
        })
        .collect()
}

fn print_table(rows: Vec<RepoGroupsJson>) {
    if rows.is_empty() {
        println!("No repos in library.");
        return;
    }
    for repo in rows {
        println!("{} ({} group(s))", repo.repo.bold(), repo.groups.len());
        for warning in &repo.warnings {
            println!("  {} {warning}", "warning:".yellow());
        }
        if repo.groups.is_empty() {
            continue;
        }
        let table_rows: Vec<GroupTableRow> = repo
            .groups
            .into_iter()
            .map(|g| GroupTableRow {
                tags: g.tags.join(", "),
                entries: g.entries.join(", "),
                architectures: g.architectures.join(", "),
            })
            .collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");
    }
}
