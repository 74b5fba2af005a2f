use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for changelog and version operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Invalid version format: '{0}' - expected [v]MAJOR.MINOR.PATCH[-pre][+build]")]
    InvalidVersionFormat(String),

    #[error("Malformed changelog: {0}")]
    MalformedDocument(String),

    #[error("Unknown changelog section: '{0}' - expected one of Added, Changed, Deprecated, Removed, Fixed, Security")]
    UnknownSection(String),

    #[error("Changelog entry is empty")]
    EmptyEntry,

    #[error("Changelog already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Changelog not found: {} (run `init` first)", .0.display())]
    NotFound(PathBuf),

    #[error("No version token supplied for release")]
    NoVersionToken,

    #[error("No released version found in changelog")]
    NoVersionFound,

    #[error("Version '{0}' is already released in the changelog")]
    AlreadyReleased(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-changelog
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a version format error echoing the offending input
    pub fn version(input: impl Into<String>) -> Self {
        ChangelogError::InvalidVersionFormat(input.into())
    }

    /// Create a malformed document error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        ChangelogError::MalformedDocument(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }
}
