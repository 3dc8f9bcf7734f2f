//! Registry metadata lookups.
//!
//! [`TagMetaSource`] is the seam the spec generator and staleness gate call
//! through. [`HubClient`] implements it against the Docker Hub v2 API:
//! `GET {base}/v2/repositories/{namespace}/{repo}/tags/{tag}/`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use tagsync_core::RemoteTagMeta;

/// Looks up the last-updated time of an image reference.
///
/// Never fails: unreachable or unknown tags are reported as absent.
pub trait TagMetaSource {
    fn fetch_tag_meta(&self, image: &str) -> RemoteTagMeta;
}

impl<T: TagMetaSource + ?Sized> TagMetaSource for &T {
    fn fetch_tag_meta(&self, image: &str) -> RemoteTagMeta {
        (**self).fetch_tag_meta(image)
    }
}

#[derive(Debug, Deserialize)]
struct HubTag {
    last_updated: Option<String>,
}

/// Blocking Docker Hub client.
pub struct HubClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HubClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("tagsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// API URL for `image`, or `None` if the reference has no repository.
    pub fn tag_url(&self, image: &str) -> Option<String> {
        let (repo, tag) = split_reference(image)?;
        let repo = if repo.contains('/') {
            repo.to_owned()
        } else {
            format!("library/{repo}")
        };
        Some(format!(
            "{}/v2/repositories/{repo}/tags/{tag}/",
            self.base_url
        ))
    }
}

impl TagMetaSource for HubClient {
    fn fetch_tag_meta(&self, image: &str) -> RemoteTagMeta {
        let Some(url) = self.tag_url(image) else {
            return RemoteTagMeta::absent();
        };
        let tag: HubTag = match self.agent.get(&url).call() {
            Ok(response) => match response.into_json() {
                Ok(tag) => tag,
                Err(err) => {
                    tracing::debug!("unreadable tag metadata for {image}: {err}");
                    return RemoteTagMeta::absent();
                }
            },
            Err(err) => {
                tracing::debug!("tag metadata lookup for {image} failed: {err}");
                return RemoteTagMeta::absent();
            }
        };
        match tag.last_updated.as_deref().and_then(parse_timestamp) {
            Some(at) => RemoteTagMeta::updated_at(at),
            None => RemoteTagMeta::absent(),
        }
    }
}

/// Split `repo:tag`; a missing tag means `latest`.
fn split_reference(image: &str) -> Option<(&str, &str)> {
    let (repo, tag) = match image.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (image, "latest"),
    };
    if repo.is_empty() || tag.is_empty() {
        return None;
    }
    Some((repo, tag))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
