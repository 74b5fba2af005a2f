//! Bump workflow orchestration
//!
//! Composes the changelog engine with the version-control collaborator. It is
//! decoupled from clap and from terminal prompts: the caller supplies a
//! `confirm` callback that decides whether to continue past a warning.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::boundary::BoundaryWarning;
use crate::changelog::{self, parser, ChangelogEngine};
use crate::config::Config;
use crate::domain::{Version, VersionBump};
use crate::git::VersionControl;

/// Arguments for the bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    pub bump: VersionBump,

    /// Changelog to release into
    pub changelog_path: PathBuf,

    /// Release date, today when absent
    pub date: Option<NaiveDate>,

    /// Continue past every warning without asking
    pub force: bool,

    /// Compute the new changelog without writing, committing or tagging
    pub dry_run: bool,
}

/// Result of a completed bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    /// Tag the bump started from, empty when there was none
    pub previous: String,

    /// The new version token
    pub version: String,

    pub committed: bool,

    pub tagged: bool,

    /// New changelog text, only set on a dry run
    pub preview: Option<String>,

    /// Informational warnings that did not need confirmation
    pub notices: Vec<BoundaryWarning>,
}

/// How the workflow ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    Released(BumpOutcome),
    /// The user declined to continue past this warning
    Cancelled(BoundaryWarning),
}

fn proceed<F>(warning: &BoundaryWarning, force: bool, confirm: &mut F) -> Result<bool>
where
    F: FnMut(&BoundaryWarning) -> Result<bool>,
{
    if force {
        warn!(%warning, "continuing because of --force");
        return Ok(true);
    }
    confirm(warning)
}

/// Main bump workflow
///
/// 1. Check the working tree is clean
/// 2. Read the current version from tags
/// 3. Compare it with the changelog's latest release
/// 4. Bump and format the new version token
/// 5. Cut the release into the changelog
/// 6. Commit and tag, as configured
///
/// Any failure before step 5 leaves the changelog untouched.
pub fn run_bump<R, F>(
    args: &BumpWorkflowArgs,
    config: &Config,
    repo: &R,
    mut confirm: F,
) -> Result<WorkflowResult>
where
    R: VersionControl,
    F: FnMut(&BoundaryWarning) -> Result<bool>,
{
    let path = args.changelog_path.as_path();

    if config.behavior.require_clean
        && !args.dry_run
        && repo.has_uncommitted_changes(Some(path))?
    {
        let warning = BoundaryWarning::UncommittedChanges;
        if !proceed(&warning, args.force, &mut confirm)? {
            return Ok(WorkflowResult::Cancelled(warning));
        }
    }

    let previous = repo.current_version()?;
    let current = Version::parse(&previous)?;
    let text = changelog::read_changelog(path)?;

    if !previous.is_empty() {
        if let Ok(latest) = changelog::latest_released_version(&text) {
            let released = Version::parse(&latest)?;
            if released.compare(&current) != Ordering::Equal {
                let warning = BoundaryWarning::VersionMismatch {
                    changelog: latest,
                    tag: previous.clone(),
                };
                if !proceed(&warning, args.force, &mut confirm)? {
                    return Ok(WorkflowResult::Cancelled(warning));
                }
            }
        }
    }

    let next = current.bump(&args.bump)?;
    let version = config.versioning.prefix.apply(&next);
    info!(previous = %previous, version = %version, "computed next version");

    let pending = parser::parse(&text)
        .unreleased
        .map(|section| section.entry_count())
        .unwrap_or(0);
    if pending == 0 {
        let warning = BoundaryWarning::EmptyRelease {
            version: version.clone(),
        };
        if !proceed(&warning, args.force, &mut confirm)? {
            return Ok(WorkflowResult::Cancelled(warning));
        }
    }

    let mut notices = Vec::new();
    let remote_url = repo.remote_url(&config.repository.remote)?;
    let target = config.repository.link_target(remote_url.as_deref());
    if target.is_none() {
        notices.push(BoundaryWarning::NoLinkTarget {
            remote: config.repository.remote.clone(),
        });
    }
    let engine = ChangelogEngine::new(target);

    if args.dry_run {
        let preview = engine.release_text(&text, &version, args.date)?;
        return Ok(WorkflowResult::Released(BumpOutcome {
            previous,
            version,
            committed: false,
            tagged: false,
            preview: Some(preview),
            notices,
        }));
    }

    engine.release(path, &version, args.date)?;

    let committed = if config.behavior.commit {
        repo.commit_file(path, &format!("chore(release): {}", version))?;
        true
    } else {
        false
    };

    let tagged = if config.behavior.tag {
        repo.create_tag(&version, &format!("Release {}", version))?;
        true
    } else {
        false
    };

    Ok(WorkflowResult::Released(BumpOutcome {
        previous,
        version,
        committed,
        tagged,
        preview: None,
        notices,
    }))
}
