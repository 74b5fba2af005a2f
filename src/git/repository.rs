use super::{highest_version_tag, VersionControl};
use crate::error::{ChangelogError, Result};
use git2::{Commit, ErrorCode, Repository as Git2Repo, Status, StatusOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Path of `path` relative to the working directory, as the index wants it
    fn index_path(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self.repo.workdir().ok_or_else(|| {
            ChangelogError::Git(git2::Error::from_str(
                "bare repository has no working directory",
            ))
        })?;
        let workdir = fs::canonicalize(workdir)?;
        let absolute = fs::canonicalize(path)?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ChangelogError::Git(git2::Error::from_str(&format!(
                    "'{}' is outside the repository",
                    path.display()
                )))
            })
    }
}

impl VersionControl for Git2Repository {
    fn current_version(&self) -> Result<String> {
        let tags = self.repo.tag_names(None)?;
        let current = highest_version_tag(tags.iter().flatten())
            .unwrap_or_default()
            .to_string();
        debug!(current = %current, "resolved current version tag");
        Ok(current)
    }

    fn has_uncommitted_changes(&self, except: Option<&Path>) -> Result<bool> {
        let except = except.and_then(|path| self.index_path(path).ok());

        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.iter().any(|entry| {
            let ignored = match (&except, entry.path()) {
                (Some(except), Some(path)) => Path::new(path) == except.as_path(),
                _ => false,
            };
            !ignored && entry.status() != Status::CURRENT
        }))
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<()> {
        let relative = self.index_path(path)?;

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = self.head_commit()?;
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        debug!(commit = %oid, path = %relative.display(), "committed changelog");
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self
            .head_commit()?
            .ok_or_else(|| ChangelogError::Git(git2::Error::from_str("HEAD has no commit to tag")))?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        debug!(tag = name, "created tag");
        Ok(())
    }
}
