//! Domain logic - pure release rules independent of git, npm and the environment

pub mod branch;
pub mod classifier;
pub mod context;
pub mod plan;
pub mod snapshot;
pub mod tag;
pub mod version;

pub use branch::{BranchMatcher, BranchRule, BranchTable};
pub use classifier::{ReleaseClassifier, SecondaryTagPolicy};
pub use context::ReleaseContext;
pub use plan::PublishPlan;
pub use snapshot::build_snapshot_version;
pub use tag::{DistTag, TagTemplate};
pub use version::{parse_version, release_core, resolve_tag_version};
