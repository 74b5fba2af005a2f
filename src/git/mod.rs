//! Version-control collaborator
//!
//! The changelog engine never talks to git. The bump workflow does, through
//! the [VersionControl] trait, so it can be driven by a real repository or
//! by a mock in tests.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation that records calls
//!
//! ```rust
//! # use git_changelog::git::VersionControl;
//! # fn example<R: VersionControl>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let current = repo.current_version()?;
//! if current.is_empty() {
//!     println!("no version tags yet");
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Git operations the bump workflow needs
pub trait VersionControl {
    /// Highest tag that parses as a version, verbatim
    ///
    /// Returns an empty string when the repository has no version tags.
    fn current_version(&self) -> Result<String>;

    /// Whether tracked files other than `except` have uncommitted modifications
    fn has_uncommitted_changes(&self, except: Option<&Path>) -> Result<bool>;

    /// URL of a remote, `None` when the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Stage `path` and commit it on HEAD
    fn commit_file(&self, path: &Path, message: &str) -> Result<()>;

    /// Create an annotated tag on HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;
}

/// Pick the highest version among tag names, ignoring tags that are not versions
pub fn highest_version_tag<'a, I>(tags: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    use crate::domain::Version;

    tags.into_iter()
        .filter_map(|tag| Version::parse(tag).ok().map(|v| (tag, v)))
        .max_by(|(_, a), (_, b)| a.compare(b))
        .map(|(tag, _)| tag)
}
