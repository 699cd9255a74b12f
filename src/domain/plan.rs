use std::fmt;

use semver::Version;

use super::tag::DistTag;

/// What to publish: the version, the primary dist-tags, and an optional marker
/// tag applied only after the primary publish succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    pub version: Version,
    pub tags: Vec<DistTag>,
    pub secondary_tag: Option<DistTag>,
}

impl PublishPlan {
    pub fn new(version: Version, tags: Vec<DistTag>) -> Self {
        PublishPlan {
            version,
            tags,
            secondary_tag: None,
        }
    }

    pub fn with_secondary_tag(mut self, tag: DistTag) -> Self {
        self.secondary_tag = Some(tag);
        self
    }

    /// The first primary tag, if the publish is tagged at all
    pub fn primary_tag(&self) -> Option<&DistTag> {
        self.tags.first()
    }
}

impl fmt::Display for PublishPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version={} and tag=", self.version)?;
        if self.tags.is_empty() {
            write!(f, "<empty tag>")?;
        } else {
            let labels: Vec<&str> = self.tags.iter().map(DistTag::as_str).collect();
            write!(f, "{}", labels.join(","))?;
        }
        Ok(())
    }
}
