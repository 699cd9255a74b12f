use chrono::{DateTime, Utc};
use semver::Version;

/// Everything the classifier needs to know about one release invocation.
///
/// Collected once at startup from CLI flags, environment, VCS and manifest, then
/// never changed. Missing branch or commit information is an empty string; the
/// classifier decides whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub branch: String,
    pub explicit_tag: Option<String>,
    pub commit_short: String,
    pub manifest_version: Version,
    pub build_time: DateTime<Utc>,
}

impl ReleaseContext {
    /// The explicit release tag, ignoring blank values
    pub fn explicit_tag(&self) -> Option<&str> {
        self.explicit_tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    pub fn has_branch(&self) -> bool {
        !self.branch.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn context(branch: &str, tag: Option<&str>) -> ReleaseContext {
        ReleaseContext {
            branch: branch.to_string(),
            explicit_tag: tag.map(str::to_string),
            commit_short: "abc1234".to_string(),
            manifest_version: Version::new(1, 0, 0),
            build_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_explicit_tag_blank_is_none() {
        assert_eq!(context("master", Some("  ")).explicit_tag(), None);
        assert_eq!(context("master", None).explicit_tag(), None);
    }

    #[test]
    fn test_explicit_tag_trimmed() {
        assert_eq!(context("master", Some(" v1.0.0 ")).explicit_tag(), Some("v1.0.0"));
    }

    #[test]
    fn test_has_branch() {
        assert!(context("develop", None).has_branch());
        assert!(!context("", None).has_branch());
        assert!(!context("  ", None).has_branch());
    }
}
