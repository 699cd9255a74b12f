use std::fmt;

use regex::Regex;
use semver::{Version, VersionReq};

use crate::error::{PublishError, Result};

/// A registry dist-tag label (e.g. "latest", "next", "dev-login")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistTag(String);

impl DistTag {
    /// Create a dist-tag from a label, rejecting labels the registry refuses.
    ///
    /// A label may not be empty, contain whitespace, or parse as a version
    /// range ("1.2.3", "^2", "*"), since the registry would read it as one.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();

        if label.is_empty() {
            return Err(PublishError::config("Dist-tag label must not be empty"));
        }

        if label.chars().any(char::is_whitespace) {
            return Err(PublishError::config(format!(
                "Dist-tag label '{}' must not contain whitespace",
                label
            )));
        }

        if VersionReq::parse(&label).is_ok() {
            return Err(PublishError::config(format!(
                "Dist-tag label '{}' must not be a version or version range",
                label
            )));
        }

        Ok(DistTag(label))
    }

    /// Create a dist-tag after replacing characters outside `[A-Za-z0-9._-]` with `-`.
    ///
    /// Branch names such as "feature/login" become "feature-login".
    pub fn sanitized(raw: &str) -> Result<Self> {
        let re = Regex::new(r"[^A-Za-z0-9._-]")
            .map_err(|e| PublishError::config(format!("Invalid label pattern: {}", e)))?;
        Self::new(re.replace_all(raw, "-").into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DistTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dist-tag naming template (e.g. "latest", "{branch}", "{branch}-branch{version}")
///
/// `{branch}` expands to the branch name and `{version}` to the manifest's
/// major.minor.patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTemplate {
    pub pattern: String,
}

impl TagTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        TagTemplate {
            pattern: pattern.into(),
        }
    }

    /// Expand the placeholders without validating the result
    /// Example: pattern="{branch}-branch{version}", branch="topic", version="1.2.3" -> "topic-branch1.2.3"
    pub fn expand(&self, branch: &str, version: &Version) -> String {
        self.pattern
            .replace("{branch}", branch)
            .replace("{version}", &version.to_string())
    }

    /// Render the template into a sanitized dist-tag
    pub fn render(&self, branch: &str, version: &Version) -> Result<DistTag> {
        DistTag::sanitized(&self.expand(branch, version))
    }

    /// Check the template can produce a legal label
    pub fn validate(&self) -> Result<()> {
        self.render("branch", &Version::new(0, 0, 0))
            .map(|_| ())
            .map_err(|e| {
                PublishError::config(format!("Tag template '{}' is unusable: {}", self.pattern, e))
            })
    }
}
