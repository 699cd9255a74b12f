//! Release classification: from a [`ReleaseContext`] to a [`PublishPlan`].
//!
//! Precedence, first match wins:
//! 1. an explicit tag that is a valid version publishes exactly that version, untagged
//! 2. any other explicit tag publishes a snapshot under `tag-<explicit tag>`
//! 3. otherwise the branch table picks the dist-tag for a snapshot
//!
//! The classifier only reads its input, so the same context always yields the
//! same plan.

use semver::Version;
use tracing::debug;

use super::branch::BranchTable;
use super::context::ReleaseContext;
use super::plan::PublishPlan;
use super::snapshot::build_snapshot_version;
use super::tag::DistTag;
use super::version::{release_core, resolve_tag_version};
use crate::error::{PublishError, Result};

/// Naming of the marker tag added after a successful publish
///
/// Defaults are `latest-` for tagged publishes and `stable-` for untagged ones.
/// Do not swap them: release tooling already reads markers named this way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryTagPolicy {
    /// Prefix used when the publish carried a primary dist-tag
    pub tagged_prefix: String,
    /// Prefix used when the publish was untagged
    pub untagged_prefix: String,
}

impl SecondaryTagPolicy {
    /// Marker label for a plan, e.g. "latest-1.4.0" or "stable-2.3.0"
    pub fn marker_for(&self, version: &Version, tagged: bool) -> Result<DistTag> {
        let prefix = if tagged {
            &self.tagged_prefix
        } else {
            &self.untagged_prefix
        };
        DistTag::new(format!("{}{}", prefix, release_core(version)))
    }
}

impl Default for SecondaryTagPolicy {
    fn default() -> Self {
        SecondaryTagPolicy {
            tagged_prefix: "latest-".to_string(),
            untagged_prefix: "stable-".to_string(),
        }
    }
}

/// Decides version and dist-tags for a release
#[derive(Debug, Clone)]
pub struct ReleaseClassifier {
    branches: BranchTable,
    marker_prefix: String,
    secondary: Option<SecondaryTagPolicy>,
}

impl ReleaseClassifier {
    pub fn new(branches: BranchTable) -> Self {
        ReleaseClassifier {
            branches,
            marker_prefix: "tag-".to_string(),
            secondary: Some(SecondaryTagPolicy::default()),
        }
    }

    /// Prefix for dist-tags derived from explicit tags that are not versions
    pub fn with_marker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.marker_prefix = prefix.into();
        self
    }

    /// Set or disable (`None`) the secondary marker tag
    pub fn with_secondary_tag(mut self, policy: Option<SecondaryTagPolicy>) -> Self {
        self.secondary = policy;
        self
    }

    pub fn classify(&self, ctx: &ReleaseContext) -> Result<PublishPlan> {
        let (version, tags) = match ctx.explicit_tag() {
            Some(tag) => match resolve_tag_version(tag) {
                Some(version) => {
                    debug!(tag, "explicit tag is a version, publishing it untagged");
                    (version, Vec::new())
                }
                None => {
                    debug!(tag, "explicit tag is a release marker");
                    let label = DistTag::sanitized(&format!("{}{}", self.marker_prefix, tag))?;
                    (self.snapshot(ctx)?, vec![label])
                }
            },
            None => self.branch_build(ctx)?,
        };

        let mut plan = PublishPlan::new(version, tags);
        if let Some(policy) = &self.secondary {
            let marker = policy.marker_for(&plan.version, !plan.tags.is_empty())?;
            plan = plan.with_secondary_tag(marker);
        }

        Ok(plan)
    }

    fn branch_build(&self, ctx: &ReleaseContext) -> Result<(Version, Vec<DistTag>)> {
        if !ctx.has_branch() {
            return Err(PublishError::branch(
                "No branch name available (set BRANCH_NAME or run inside a checked-out branch)",
            ));
        }

        let branch = ctx.branch.trim();
        let rule = self.branches.resolve(branch).ok_or_else(|| {
            PublishError::branch(format!("No branch rule matches branch '{}'", branch))
        })?;
        debug!(branch, template = %rule.template.pattern, "branch rule matched");

        let version = self.snapshot(ctx)?;
        let label = rule
            .template
            .render(branch, &release_core(&ctx.manifest_version))?;

        Ok((version, vec![label]))
    }

    fn snapshot(&self, ctx: &ReleaseContext) -> Result<Version> {
        build_snapshot_version(&ctx.manifest_version, &ctx.commit_short, &ctx.build_time)
    }
}

impl Default for ReleaseClassifier {
    fn default() -> Self {
        ReleaseClassifier::new(BranchTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::branch::{BranchMatcher, BranchRule};
    use chrono::{TimeZone, Utc};

    fn context(branch: &str, tag: Option<&str>) -> ReleaseContext {
        ReleaseContext {
            branch: branch.to_string(),
            explicit_tag: tag.map(str::to_string),
            commit_short: "a1b2c3d".to_string(),
            manifest_version: Version::parse("1.4.0").unwrap(),
            build_time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn labels(plan: &PublishPlan) -> Vec<&str> {
        plan.tags.iter().map(DistTag::as_str).collect()
    }

    const SNAPSHOT: &str = "1.4.0-20240102030405.a1b2c3d";

    #[test]
    fn test_master_publishes_latest_snapshot() {
        let plan = ReleaseClassifier::default()
            .classify(&context("master", None))
            .unwrap();
        assert_eq!(labels(&plan), vec!["latest"]);
        assert_eq!(plan.version.to_string(), SNAPSHOT);
    }

    #[test]
    fn test_develop_publishes_next() {
        let plan = ReleaseClassifier::default()
            .classify(&context("develop", None))
            .unwrap();
        assert_eq!(labels(&plan), vec!["next"]);
        assert_eq!(plan.version.to_string(), SNAPSHOT);
    }

    #[test]
    fn test_dev_branch_publishes_under_its_name() {
        let plan = ReleaseClassifier::default()
            .classify(&context("dev-login", None))
            .unwrap();
        assert_eq!(labels(&plan), vec!["dev-login"]);
    }

    #[test]
    fn test_other_branch_gets_derived_label() {
        let plan = ReleaseClassifier::default()
            .classify(&context("feature/search", None))
            .unwrap();
        assert_eq!(labels(&plan), vec!["feature-search-branch1.4.0"]);
        assert_eq!(plan.version.to_string(), SNAPSHOT);
    }

    #[test]
    fn test_valid_semver_tag_wins_regardless_of_branch() {
        for branch in ["master", "develop", "dev-x", "anything", ""] {
            let plan = ReleaseClassifier::default()
                .classify(&context(branch, Some("2.3.0")))
                .unwrap();
            assert_eq!(plan.version, Version::new(2, 3, 0));
            assert!(plan.tags.is_empty());
        }
    }

    #[test]
    fn test_valid_semver_tag_with_v_prefix() {
        let plan = ReleaseClassifier::default()
            .classify(&context("master", Some("v2.3.0")))
            .unwrap();
        assert_eq!(plan.version, Version::new(2, 3, 0));
    }

    #[test]
    fn test_valid_semver_tag_needs_no_commit() {
        let mut ctx = context("", Some("2.3.0"));
        ctx.commit_short = String::new();
        assert!(ReleaseClassifier::default().classify(&ctx).is_ok());
    }

    #[test]
    fn test_non_semver_tag_publishes_marker_snapshot() {
        let plan = ReleaseClassifier::default()
            .classify(&context("master", Some("nightly-2024")))
            .unwrap();
        assert_eq!(labels(&plan), vec!["tag-nightly-2024"]);
        assert_eq!(plan.version.to_string(), SNAPSHOT);
    }

    #[test]
    fn test_blank_tag_is_ignored() {
        let plan = ReleaseClassifier::default()
            .classify(&context("develop", Some("")))
            .unwrap();
        assert_eq!(labels(&plan), vec!["next"]);
    }

    #[test]
    fn test_empty_branch_without_tag_fails() {
        for branch in ["", "   "] {
            let err = ReleaseClassifier::default()
                .classify(&context(branch, None))
                .unwrap_err();
            assert!(matches!(err, PublishError::InvalidBranch(_)));
        }
    }

    #[test]
    fn test_empty_branch_reported_before_missing_commit() {
        let mut ctx = context("", None);
        ctx.commit_short = String::new();
        let err = ReleaseClassifier::default().classify(&ctx).unwrap_err();
        assert!(matches!(err, PublishError::InvalidBranch(_)));
    }

    #[test]
    fn test_missing_commit_fails_snapshot() {
        let mut ctx = context("master", None);
        ctx.commit_short = String::new();
        let err = ReleaseClassifier::default().classify(&ctx).unwrap_err();
        assert!(matches!(err, PublishError::MissingCommit(_)));
    }

    #[test]
    fn test_unmatched_branch_fails() {
        let classifier = ReleaseClassifier::new(BranchTable::new(vec![BranchRule::new(
            BranchMatcher::Exact("main".to_string()),
            "latest",
        )]));
        let err = classifier.classify(&context("develop", None)).unwrap_err();
        assert!(matches!(err, PublishError::InvalidBranch(_)));
    }

    #[test]
    fn test_custom_table() {
        let classifier = ReleaseClassifier::new(BranchTable::new(vec![
            BranchRule::new(BranchMatcher::Exact("main".to_string()), "latest"),
            BranchRule::new(BranchMatcher::Prefix("release/".to_string()), "rc"),
        ]));
        let plan = classifier.classify(&context("release/1.4", None)).unwrap();
        assert_eq!(labels(&plan), vec!["rc"]);
    }

    #[test]
    fn test_classify_is_pure() {
        let classifier = ReleaseClassifier::default();
        for ctx in [
            context("master", None),
            context("feature/x", None),
            context("master", Some("2.3.0")),
            context("develop", Some("nightly")),
        ] {
            let first = classifier.classify(&ctx).unwrap();
            let second = classifier.classify(&ctx.clone()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_secondary_tag_for_tagged_publish() {
        let plan = ReleaseClassifier::default()
            .classify(&context("master", None))
            .unwrap();
        assert_eq!(plan.secondary_tag.unwrap().as_str(), "latest-1.4.0");
    }

    #[test]
    fn test_secondary_tag_for_untagged_publish() {
        let plan = ReleaseClassifier::default()
            .classify(&context("master", Some("2.3.0")))
            .unwrap();
        assert_eq!(plan.secondary_tag.unwrap().as_str(), "stable-2.3.0");
    }

    #[test]
    fn test_secondary_tag_disabled() {
        let plan = ReleaseClassifier::default()
            .with_secondary_tag(None)
            .classify(&context("master", None))
            .unwrap();
        assert_eq!(plan.secondary_tag, None);
    }

    #[test]
    fn test_custom_marker_prefix() {
        let plan = ReleaseClassifier::default()
            .with_marker_prefix("ci-")
            .classify(&context("master", Some("nightly")))
            .unwrap();
        assert_eq!(labels(&plan), vec!["ci-nightly"]);
    }
}
