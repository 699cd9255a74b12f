//! Version control abstraction layer
//!
//! The release context needs two facts from version control: the branch being
//! built and the abbreviated id of the commit being built. The [`Vcs`] trait
//! provides them; implementations are:
//!
//! - [`repository::Git2Vcs`]: reads a real repository through the `git2` crate
//! - [`mock::MockVcs`]: returns fixed answers for tests
//!
//! # Usage
//!
//! ```rust
//! # use dist_publish::git::{MockVcs, Vcs};
//! let vcs = MockVcs::new(Some("develop"), Some("a1b2c3d"));
//! assert_eq!(vcs.current_branch().unwrap().as_deref(), Some("develop"));
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockVcs;
pub use repository::Git2Vcs;

use crate::error::Result;

/// Version-control queries used to build the release context
///
/// "Not available" is `Ok(None)`, not an error: a detached HEAD has no branch
/// and an empty repository has no commit. Errors are reserved for a repository
/// that cannot be read at all.
pub trait Vcs {
    /// Name of the checked-out branch, or `None` on a detached or unborn HEAD
    fn current_branch(&self) -> Result<Option<String>>;

    /// Abbreviated id of the HEAD commit (e.g. "a1b2c3d"), or `None` before the first commit
    fn current_commit_short(&self) -> Result<Option<String>>;
}
