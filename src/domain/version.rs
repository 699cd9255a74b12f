use semver::{BuildMetadata, Prerelease, Version};

use crate::error::{PublishError, Result};

/// Parse a version the way the manifest stores it ("1.2.3", "1.2.3-beta.1+build").
///
/// Surrounding whitespace is ignored; anything else must be strict semver.
pub fn parse_version(raw: &str) -> Result<Version> {
    Version::parse(raw.trim())
        .map_err(|e| PublishError::version(format!("Invalid semantic version '{}': {}", raw, e)))
}

/// Resolve an explicit release tag to a version, if it is one.
///
/// Matches the registry's strict validity check: surrounding whitespace and a
/// single lowercase `v` are allowed, so "v1.2.3" is accepted while "=1.2.3",
/// "V1.2.3" and "nightly-2024" are not.
pub fn resolve_tag_version(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let clean_tag = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(clean_tag).ok()
}

/// The release core of a version: major.minor.patch with no pre-release or build.
pub fn release_core(version: &Version) -> Version {
    Version {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    }
}
