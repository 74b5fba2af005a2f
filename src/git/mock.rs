use crate::error::{ChangelogError, Result};
use crate::git::{highest_version_tag, VersionControl};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
///
/// Commits and tags are recorded so tests can assert on them.
#[derive(Debug, Default)]
pub struct MockRepository {
    tags: RefCell<Vec<String>>,
    remotes: HashMap<String, String>,
    dirty: bool,
    fail_tagging: bool,
    commits: RefCell<Vec<(PathBuf, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().push(name.into());
    }

    /// Register a remote URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Mark the working tree as having uncommitted changes
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Make `create_tag` fail, as when the tag already exists
    pub fn set_fail_tagging(&mut self, fail: bool) {
        self.fail_tagging = fail;
    }

    /// Tags in creation order, including those added with `add_tag`
    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    /// Recorded `(path, message)` commits
    pub fn commits(&self) -> Vec<(PathBuf, String)> {
        self.commits.borrow().clone()
    }
}

impl VersionControl for MockRepository {
    fn current_version(&self) -> Result<String> {
        let tags = self.tags.borrow();
        let current = highest_version_tag(tags.iter().map(String::as_str))
            .unwrap_or_default()
            .to_string();
        Ok(current)
    }

    fn has_uncommitted_changes(&self, _except: Option<&Path>) -> Result<bool> {
        Ok(self.dirty)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<()> {
        self.commits
            .borrow_mut()
            .push((path.to_path_buf(), message.to_string()));
        Ok(())
    }

    fn create_tag(&self, name: &str, _message: &str) -> Result<()> {
        if self.fail_tagging || self.tags.borrow().iter().any(|t| t == name) {
            return Err(ChangelogError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }
        self.tags.borrow_mut().push(name.to_string());
        Ok(())
    }
}
