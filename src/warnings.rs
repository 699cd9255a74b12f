use std::fmt;

/// Non-fatal problems met during a release.
/// These are reported to the user but never change the exit code.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishWarning {
    /// The marker dist-tag could not be applied after a successful publish
    SecondaryTagFailed { tag: String, reason: String },
    /// The working directory could not be read as a repository
    VcsUnavailable { reason: String },
    /// HEAD is detached, so version control reports no branch
    DetachedHead,
    /// A dry run could not read the current target of a dist-tag
    DistTagQueryFailed { tag: String, reason: String },
}

impl fmt::Display for PublishWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishWarning::SecondaryTagFailed { tag, reason } => {
                write!(f, "Could not add dist-tag '{}': {}", tag, reason)
            }
            PublishWarning::VcsUnavailable { reason } => {
                write!(
                    f,
                    "Version control unavailable, branch and commit unknown: {}",
                    reason
                )
            }
            PublishWarning::DetachedHead => {
                write!(f, "HEAD is detached and no branch was provided")
            }
            PublishWarning::DistTagQueryFailed { tag, reason } => {
                write!(f, "Cannot read dist-tag '{}': {}", tag, reason)
            }
        }
    }
}
