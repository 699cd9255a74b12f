use super::Vcs;
use crate::error::{PublishError, Result};

/// Mock version control with fixed answers
#[derive(Debug, Clone, Default)]
pub struct MockVcs {
    branch: Option<String>,
    commit_short: Option<String>,
    broken: bool,
}

impl MockVcs {
    pub fn new(branch: Option<&str>, commit_short: Option<&str>) -> Self {
        MockVcs {
            branch: branch.map(str::to_string),
            commit_short: commit_short.map(str::to_string),
            broken: false,
        }
    }

    /// A repository whose every query fails
    pub fn broken() -> Self {
        MockVcs {
            broken: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.broken {
            return Err(PublishError::Git(git2::Error::from_str(
                "simulated repository failure",
            )));
        }
        Ok(())
    }
}

impl Vcs for MockVcs {
    fn current_branch(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.branch.clone())
    }

    fn current_commit_short(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.commit_short.clone())
    }
}
