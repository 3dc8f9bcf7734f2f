//! Put-shared driver: repos → groups → specs → staleness gate → publish.
//!
//! Processing is strictly sequential (repos, then groups, then tags) and
//! stops at the first fatal error. Diagnostics returned by the components
//! are collected into the [`RunReport`] and logged here, in order.

use serde::Serialize;

use tagsync_core::{ArchNamespaces, Library, Repo};

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::PublishError;
use crate::groups::build_groups;
use crate::hub::TagMetaSource;
use crate::publisher::Publisher;
use crate::spec::{build_manifest_body, build_target_spec, PublishSpec};
use crate::staleness::gate;

/// Which repos a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoScope {
    /// Every repo in the library.
    All,
    /// The named repos (`repo` or `repo:tag`), in the order given.
    Named(Vec<String>),
}

/// Outcome of one tag group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub repo: String,
    /// `target:canonicalTag` for the group as declared.
    pub group: String,
    pub published: Vec<String>,
    pub skipped: Vec<String>,
    /// The document handed to the publisher, if anything was pushed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<PublishSpec>,
}

/// Everything a run did, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub groups: Vec<GroupReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn published_count(&self) -> usize {
        self.groups.iter().filter(|g| g.spec.is_some()).count()
    }

    pub fn published_tags(&self) -> usize {
        self.groups.iter().map(|g| g.published.len()).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!("{diagnostic}"),
            Severity::Info => tracing::info!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    fn emit_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.emit(d);
        }
    }
}

/// Target namespace `/` repo name, without doubled slashes.
pub fn target_repo(namespace: &str, repo_name: &str) -> String {
    let namespace = namespace.trim_end_matches('/');
    if namespace.is_empty() {
        return repo_name.to_owned();
    }
    format!("{namespace}/{repo_name}")
}

/// Drives put-shared for one target namespace.
pub struct PublishDriver<M, P> {
    namespace: String,
    arch_namespaces: ArchNamespaces,
    meta: M,
    publisher: P,
}

impl<M: TagMetaSource, P: Publisher> PublishDriver<M, P> {
    pub fn new(
        namespace: impl Into<String>,
        arch_namespaces: ArchNamespaces,
        meta: M,
        publisher: P,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            arch_namespaces,
            meta,
            publisher,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Fetch each repo of `scope` from `library` and process it before
    /// fetching the next.
    pub fn run_scope(
        &mut self,
        library: &Library,
        scope: &RepoScope,
    ) -> Result<RunReport, PublishError> {
        let names = match scope {
            RepoScope::All => library.repo_names()?,
            RepoScope::Named(names) => names.clone(),
        };
        let mut report = RunReport::default();
        for name in &names {
            let repo = library.fetch(name)?;
            self.run_repo(&repo, &mut report)?;
        }
        Ok(report)
    }

    /// Process already loaded repos, in order.
    pub fn run(&mut self, repos: &[Repo]) -> Result<RunReport, PublishError> {
        let mut report = RunReport::default();
        for repo in repos {
            self.run_repo(repo, &mut report)?;
        }
        Ok(report)
    }

    pub fn run_repo(&mut self, repo: &Repo, report: &mut RunReport) -> Result<(), PublishError> {
        let target = target_repo(&self.namespace, &repo.name);
        let plan = build_groups(repo)?;
        report.emit_all(plan.diagnostics);

        for group in &plan.groups {
            let body =
                build_manifest_body(repo, &self.arch_namespaces, &self.meta, group.entries())?;
            report.emit_all(body.diagnostics.iter().cloned());

            let outcome = gate(group, &target, body.most_recent_update, &self.meta);
            report.emit_all(outcome.diagnostics());

            let mut group_report = GroupReport {
                repo: repo.name.clone(),
                group: format!("{target}:{}", group.canonical_tag()),
                published: Vec::new(),
                skipped: outcome.skipped.iter().map(|s| s.tag.clone()).collect(),
                spec: None,
            };

            let Some(spec) = build_target_spec(&target, &outcome.publish, &body) else {
                report.groups.push(group_report);
                continue;
            };

            let image = spec.canonical_image();
            report.emit(Diagnostic::Publishing {
                image: image.clone(),
            });
            self.publisher
                .publish(&spec)
                .map_err(|source| PublishError::PublishFailed { image, source })?;

            group_report.published = outcome.publish;
            group_report.spec = Some(spec);
            report.groups.push(group_report);
        }
        Ok(())
    }
}
