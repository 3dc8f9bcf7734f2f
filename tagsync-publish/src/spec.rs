//! Manifest-list specification generation.
//!
//! [`build_manifest_body`] turns a group's entries into ordered members and
//! the newest source update among them. [`PublishSpec`] pairs those members
//! with the target tags, and [`PublishSpec::to_manifest_yaml`] is the only
//! place the manifest-tool document is written:
//!
//! ```text
//! image: myorg/sample:1.0
//! tags:
//!   - latest
//! manifests:
//!   - image: arch/amd64/sample:1.0
//!     platform:
//!       os: linux
//!       architecture: amd64
//! ```

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tagsync_core::{platform, ArchImageRef, ArchNamespaces, Entry, PlatformTriple, Repo};

use crate::diagnostics::Diagnostic;
use crate::error::PublishError;
use crate::hub::TagMetaSource;

/// One platform image inside a manifest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestMember {
    pub image: ArchImageRef,
    pub platform: PlatformTriple,
}

/// Members for one group plus the newest update among their source images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestBody {
    pub members: Vec<ManifestMember>,
    /// `None` when no member image reported an update time.
    pub most_recent_update: Option<DateTime<Utc>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Collect the members for `entries`, in entry order then architecture order.
///
/// Architectures without a source namespace are skipped with a
/// [`Diagnostic::MissingArchNamespace`]. Fails if nothing is left, or if an
/// entry has no tag to name its images by.
pub fn build_manifest_body<M: TagMetaSource + ?Sized>(
    repo: &Repo,
    namespaces: &ArchNamespaces,
    meta: &M,
    entries: &[&Entry],
) -> Result<ManifestBody, PublishError> {
    let mut members = Vec::new();
    let mut most_recent_update: Option<DateTime<Utc>> = None;
    let mut diagnostics = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(tag) = entry.tags.first() else {
            return Err(PublishError::UntaggedEntry {
                repo: repo.name.clone(),
                index,
            });
        };
        for arch in &entry.architectures {
            let platform = platform::resolve(arch)?;

            let Some(namespace) = namespaces.namespace_for(arch) else {
                diagnostics.push(Diagnostic::MissingArchNamespace {
                    arch: arch.clone(),
                    entry: repo.entry_identifier(entry),
                });
                continue;
            };

            let image = ArchImageRef {
                namespace: namespace.to_owned(),
                repo_name: repo.name.clone(),
                tag: tag.clone(),
            };
            let updated = meta.fetch_tag_meta(&image.to_string()).last_updated;
            most_recent_update = most_recent_update.max(updated);

            members.push(ManifestMember { image, platform });
        }
    }

    if members.is_empty() {
        return Err(PublishError::NoPublishableMembers {
            entries: entries.iter().map(|e| repo.entry_identifier(e)).collect(),
        });
    }

    Ok(ManifestBody {
        members,
        most_recent_update,
        diagnostics,
    })
}

/// Fully resolved document for one manifest-list push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishSpec {
    target_image: String,
    target_tags: Vec<String>,
    members: Vec<ManifestMember>,
}

impl PublishSpec {
    /// `None` if `target_tags` is empty.
    pub fn new(
        target_image: impl Into<String>,
        target_tags: Vec<String>,
        members: Vec<ManifestMember>,
    ) -> Option<Self> {
        if target_tags.is_empty() {
            return None;
        }
        Some(Self {
            target_image: target_image.into(),
            target_tags,
            members,
        })
    }

    /// Target repository, e.g. `myorg/sample`.
    pub fn target_image(&self) -> &str {
        &self.target_image
    }

    /// Never empty; the first tag is the primary reference.
    pub fn target_tags(&self) -> &[String] {
        &self.target_tags
    }

    pub fn members(&self) -> &[ManifestMember] {
        &self.members
    }

    /// `target:firstTag`.
    pub fn canonical_image(&self) -> String {
        format!("{}:{}", self.target_image, self.target_tags[0])
    }

    /// `image:` line plus the optional `tags:` list.
    pub fn target_stanza(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "image: {}", self.canonical_image());
        if self.target_tags.len() > 1 {
            out.push_str("tags:\n");
            for tag in &self.target_tags[1..] {
                let _ = writeln!(out, "  - {tag}");
            }
        }
        out
    }

    /// `manifests:` list, one stanza per member.
    pub fn manifests_stanza(&self) -> String {
        let mut out = String::from("manifests:\n");
        for member in &self.members {
            let _ = writeln!(out, "  - image: {}", member.image);
            out.push_str("    platform:\n");
            let _ = writeln!(out, "      os: {}", member.platform.os);
            let _ = writeln!(out, "      architecture: {}", member.platform.architecture);
            if let Some(variant) = member.platform.variant.as_deref().filter(|v| !v.is_empty()) {
                let _ = writeln!(out, "      variant: {variant}");
            }
        }
        out
    }

    pub fn to_manifest_yaml(&self) -> String {
        self.target_stanza() + &self.manifests_stanza()
    }
}

/// Spec for pushing `tags` of `target_repo` from an already built body.
pub fn build_target_spec(
    target_repo: &str,
    tags: &[String],
    body: &ManifestBody,
) -> Option<PublishSpec> {
    PublishSpec::new(target_repo, tags.to_vec(), body.members.clone())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;
    use tagsync_core::ArchitectureId;

    use super::*;
    use tagsync_core::RemoteTagMeta;

    struct Fixed(HashMap<String, DateTime<Utc>>);

    impl TagMetaSource for Fixed {
        fn fetch_tag_meta(&self, image: &str) -> RemoteTagMeta {
            RemoteTagMeta {
                last_updated: self.0.get(image).copied(),
            }
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn repo(entries: Vec<Entry>) -> Repo {
        Repo {
            name: "sample".to_string(),
            entries,
            tag_name: None,
        }
    }

    fn entry(tags: &[&str], arches: &[&str]) -> Entry {
        Entry {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            shared_tags: vec![],
            architectures: arches.iter().map(|a| ArchitectureId::from(*a)).collect(),
        }
    }

    fn namespaces() -> ArchNamespaces {
        [
            ("amd64", "arch/amd64"),
            ("arm32v7", "arch/arm32v7"),
            ("arm64", "arch/arm64"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn members_follow_entry_then_arch_order() {
        let r = repo(vec![
            entry(&["1.0"], &["arm64", "amd64"]),
            entry(&["2.0"], &["arm32v7"]),
        ]);
        let entries = r.entries();
        let body = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .expect("body");
        let images: Vec<String> = body.members.iter().map(|m| m.image.to_string()).collect();
        assert_eq!(
            images,
            vec![
                "arch/arm64/sample:1.0",
                "arch/amd64/sample:1.0",
                "arch/arm32v7/sample:2.0"
            ]
        );
        assert_eq!(body.most_recent_update, None);
    }

    #[test]
    fn most_recent_update_is_the_max() {
        let r = repo(vec![entry(&["1.0"], &["amd64", "arm64"])]);
        let meta = Fixed(HashMap::from([
            ("arch/amd64/sample:1.0".to_string(), at(2024, 1, 1)),
            ("arch/arm64/sample:1.0".to_string(), at(2024, 3, 1)),
        ]));
        let entries = r.entries();
        let body = build_manifest_body(&r, &namespaces(), &meta, &entries).expect("body");
        assert_eq!(body.most_recent_update, Some(at(2024, 3, 1)));
    }

    #[test]
    fn no_members_names_the_entries() {
        let r = repo(vec![entry(&["1.0"], &["s390x"])]);
        let entries = r.entries();
        let err = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .unwrap_err();
        match err {
            PublishError::NoPublishableMembers { entries } => {
                assert_eq!(entries, vec!["sample:1.0"]);
            }
            other => panic!("expected NoPublishableMembers, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_arch_is_fatal() {
        let r = repo(vec![entry(&["1.0"], &["amd64", "vax"])]);
        let entries = r.entries();
        let err = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .unwrap_err();
        assert!(matches!(err, PublishError::Platform(_)));
    }

    #[test]
    fn yaml_layout_with_variant_and_extra_tags() {
        let r = repo(vec![entry(&["1.0"], &["amd64", "arm32v7"])]);
        let entries = r.entries();
        let body = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .expect("body");
        let spec = build_target_spec(
            "myorg/sample",
            &["1.0".to_string(), "1".to_string(), "latest".to_string()],
            &body,
        )
        .expect("spec");
        assert_eq!(
            spec.to_manifest_yaml(),
            "image: myorg/sample:1.0\n\
             tags:\n  - 1\n  - latest\n\
             manifests:\n\
             \x20 - image: arch/amd64/sample:1.0\n\
             \x20   platform:\n\
             \x20     os: linux\n\
             \x20     architecture: amd64\n\
             \x20 - image: arch/arm32v7/sample:1.0\n\
             \x20   platform:\n\
             \x20     os: linux\n\
             \x20     architecture: arm\n\
             \x20     variant: v7\n"
        );
    }

    #[test]
    fn single_tag_has_no_tags_list() {
        let spec = PublishSpec::new("myorg/sample", vec!["2.0".to_string()], vec![]).expect("spec");
        assert_eq!(spec.target_stanza(), "image: myorg/sample:2.0\n");
        assert_eq!(spec.canonical_image(), "myorg/sample:2.0");
    }

    #[test]
    fn empty_tags_rejected() {
        assert!(PublishSpec::new("myorg/sample", vec![], vec![]).is_none());
    }

    #[test]
    fn accessors_expose_what_new_accepted() {
        let r = repo(vec![entry(&["1.0"], &["amd64"])]);
        let entries = r.entries();
        let body = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .expect("body");
        let spec = build_target_spec("myorg/sample", &["1.0".to_string()], &body).expect("spec");
        assert_eq!(spec.target_image(), "myorg/sample");
        assert_eq!(spec.target_tags(), ["1.0"]);
        assert_eq!(spec.members(), body.members.as_slice());
        assert!(build_target_spec("myorg/sample", &[], &body).is_none());
    }

    #[test]
    fn untagged_entry_is_an_error_not_a_panic() {
        let untagged = Entry {
            tags: vec![],
            shared_tags: vec!["x".to_string()],
            architectures: vec![ArchitectureId::from("amd64")],
        };
        let r = repo(vec![entry(&["1.0"], &["amd64"]), untagged]);
        let entries = r.entries();
        let err = build_manifest_body(&r, &namespaces(), &Fixed(HashMap::new()), &entries)
            .unwrap_err();
        assert!(matches!(err, PublishError::UntaggedEntry { index: 1, .. }));
    }
}
