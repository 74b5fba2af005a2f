use std::fmt;

/// Non-fatal conditions noticed around a bump.
/// These are reported to the user, who decides whether to continue.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Latest changelog release and latest tag disagree
    VersionMismatch { changelog: String, tag: String },
    /// Tracked files have modifications that would not be part of the release commit
    UncommittedChanges,
    /// Unreleased has no entries, the release section will be empty
    EmptyRelease { version: String },
    /// No repository slug could be resolved, the link block is left as is
    NoLinkTarget { remote: String },
}

impl BoundaryWarning {
    /// Whether the user should confirm before the workflow continues
    pub fn needs_confirmation(&self) -> bool {
        match self {
            BoundaryWarning::VersionMismatch { .. }
            | BoundaryWarning::UncommittedChanges
            | BoundaryWarning::EmptyRelease { .. } => true,
            BoundaryWarning::NoLinkTarget { .. } => false,
        }
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::VersionMismatch { changelog, tag } => {
                write!(
                    f,
                    "Changelog's latest release '{}' does not match latest tag '{}'",
                    changelog, tag
                )
            }
            BoundaryWarning::UncommittedChanges => {
                write!(f, "Working tree has uncommitted changes")
            }
            BoundaryWarning::EmptyRelease { version } => {
                write!(f, "No unreleased entries to record for '{}'", version)
            }
            BoundaryWarning::NoLinkTarget { remote } => {
                write!(
                    f,
                    "Cannot resolve repository from remote '{}', comparison links not regenerated",
                    remote
                )
            }
        }
    }
}
