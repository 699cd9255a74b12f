use std::path::Path;

use git2::{ErrorCode, Reference, Repository};

use super::Vcs;
use crate::error::Result;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Vcs {
    repo: Repository,
}

impl Git2Vcs {
    /// Open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(Git2Vcs { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository) -> Self {
        Git2Vcs { repo }
    }

    fn head(&self) -> Result<Option<Reference<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Vcs for Git2Vcs {
    fn current_branch(&self) -> Result<Option<String>> {
        let Some(head) = self.head()? else {
            return Ok(None);
        };

        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(str::to_string))
    }

    fn current_commit_short(&self) -> Result<Option<String>> {
        let Some(head) = self.head()? else {
            return Ok(None);
        };

        let commit = head.peel_to_commit()?;
        let short = commit.as_object().short_id()?;

        Ok(short.as_str().map(str::to_string))
    }
}
