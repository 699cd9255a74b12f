//! Snapshot versions: one synthetic pre-release per build.
//!
//! A snapshot keeps the base version's major.minor.patch and encodes the build
//! time and commit in the pre-release, e.g. `1.4.0-20240102030405.a1b2c3d`.
//! Because the timestamp is the first pre-release identifier and is purely
//! numeric, semver precedence orders snapshots of the same base by build time.

use chrono::{DateTime, SecondsFormat, Utc};
use semver::{BuildMetadata, Prerelease, Version};

use crate::error::{PublishError, Result};

/// Compact UTC timestamp, `YYYYMMDDHHMMSS`, sub-second truncated.
pub fn compact_timestamp(now: &DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

/// The commit as a pre-release identifier.
///
/// An all-digit id with a leading zero (e.g. "0123456") is not a legal numeric
/// identifier, so it gets git-describe's `g` prefix.
fn commit_identifier(commit: &str) -> String {
    let all_digits = commit.chars().all(|c| c.is_ascii_digit());
    if all_digits && commit.len() > 1 && commit.starts_with('0') {
        format!("g{}", commit)
    } else {
        commit.to_string()
    }
}

/// Build the snapshot version for `base` at `now` on commit `commit_short`.
pub fn build_snapshot_version(
    base: &Version,
    commit_short: &str,
    now: &DateTime<Utc>,
) -> Result<Version> {
    let commit = commit_short.trim();
    if commit.is_empty() {
        return Err(PublishError::missing_commit(
            "Unable to get git commit; snapshot versions require a commit id",
        ));
    }

    if !commit.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(PublishError::version(format!(
            "Commit id '{}' is not a valid pre-release identifier",
            commit
        )));
    }

    let pre = format!("{}.{}", compact_timestamp(now), commit_identifier(commit));
    let pre = Prerelease::new(&pre).map_err(|e| {
        PublishError::version(format!("Invalid snapshot pre-release '{}': {}", pre, e))
    })?;

    Ok(Version {
        major: base.major,
        minor: base.minor,
        patch: base.patch,
        pre,
        build: BuildMetadata::EMPTY,
    })
}
