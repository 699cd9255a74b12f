//! Package registry abstraction layer
//!
//! The publish workflow talks to the registry only through the [`Registry`]
//! trait. The implementations are:
//!
//! - [`NpmRegistry`]: drives the npm CLI through a [`CommandRunner`](crate::runner::CommandRunner)
//! - [`MockRegistry`]: records calls and fails on demand, for tests

pub mod mock;
pub mod npm;

pub use mock::{MockRegistry, RegistryCall, RegistryOperation};
pub use npm::NpmRegistry;

use semver::Version;

use crate::domain::DistTag;
use crate::error::Result;

/// Operations the publish workflow needs from a package registry
///
/// ## Error Handling
///
/// A command that the registry tool rejects is reported as
/// [`PublishError::ExternalCommand`](crate::error::PublishError::ExternalCommand)
/// with the tool's stderr, so callers can show the user why.
pub trait Registry {
    /// Write `version` into the local manifest
    ///
    /// Setting the version the manifest already has is not an error.
    fn set_version(&self, version: &Version) -> Result<()>;

    /// Publish the package in the working directory
    ///
    /// With no tags the registry applies its own default (for npm, `latest`).
    fn publish(&self, tags: &[DistTag]) -> Result<()>;

    /// Point `tag` at `package@version`
    fn add_dist_tag(&self, package: &str, version: &Version, tag: &DistTag) -> Result<()>;

    /// The version `tag` currently points to, or `None` if the tag is unset
    fn query_dist_tag(&self, tag: &DistTag) -> Result<Option<Version>>;

    /// The package name as the registry knows it
    fn query_name(&self) -> Result<String>;
}
