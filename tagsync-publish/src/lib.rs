//! # tagsync-publish
//!
//! Tag grouping, manifest-list spec generation, staleness gating, and the
//! put-shared driver.
//!
//! Build a [`PublishDriver`] with a [`TagMetaSource`] and a [`Publisher`],
//! then call [`PublishDriver::run_scope`] (or [`PublishDriver::run`] for
//! repos already in hand).

pub mod diagnostics;
pub mod error;
pub mod groups;
pub mod hub;
pub mod pipeline;
pub mod publisher;
pub mod spec;
pub mod staleness;

pub use diagnostics::{Diagnostic, Severity};
pub use error::{PublishError, PublisherError};
pub use hub::{HubClient, TagMetaSource};
pub use pipeline::{GroupReport, PublishDriver, RepoScope, RunReport};
pub use publisher::{DryRun, ManifestTool, Publisher};
pub use spec::{ManifestMember, PublishSpec};
