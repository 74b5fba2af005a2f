use super::formatter::{self, KEEP_A_CHANGELOG_LINE, SEMVER_LINE};
use super::links::{self, LinkTarget};
use super::{merger, parser, release};
use crate::error::{ChangelogError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use tracing::{debug, info};

static LATEST_RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^## \[(\d+\.\d+\.\d+)\]").expect("latest release regex is valid")
});

/// Text written by `init`
pub fn skeleton() -> String {
    formatter::format(&format!(
        "# Changelog\n\n\
         All notable changes to this project will be documented in this file.\n\n\
         {}\n{}\n\n\
         ## [Unreleased]\n",
        KEEP_A_CHANGELOG_LINE, SEMVER_LINE
    ))
}

/// Version token of the first `## [X.Y.Z]` heading
///
/// Only bare numeric tokens count: `## [v1.2.0]` or `## [1.2.0-rc.1]` are
/// skipped over.
pub fn latest_released_version(text: &str) -> Result<String> {
    LATEST_RELEASE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ChangelogError::NoVersionFound)
}

/// Reads, transforms and writes back a changelog file
///
/// Every operation parses the file fresh and writes the whole document back in
/// canonical form. Nothing is written when a step fails.
#[derive(Debug, Clone, Default)]
pub struct ChangelogEngine {
    /// Without a target the existing link block is kept as parsed
    link_target: Option<LinkTarget>,
}

impl ChangelogEngine {
    pub fn new(link_target: Option<LinkTarget>) -> Self {
        ChangelogEngine { link_target }
    }

    pub fn link_target(&self) -> Option<&LinkTarget> {
        self.link_target.as_ref()
    }

    /// Create a new changelog; an existing file is never overwritten
    ///
    /// The skeleton is written to a temporary file first, so a failed write
    /// never leaves a stub behind for the next `init` to trip over.
    pub fn init(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ChangelogError::AlreadyExists(path.to_path_buf()));
        }

        let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
        tmp.write_all(skeleton().as_bytes())?;
        tmp.flush()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))?;
        }
        tmp.persist_noclobber(path).map_err(|e| match e.error.kind() {
            io::ErrorKind::AlreadyExists => ChangelogError::AlreadyExists(path.to_path_buf()),
            _ => ChangelogError::Io(e.error),
        })?;
        info!(path = %path.display(), "created changelog");
        Ok(())
    }

    /// Add an entry under Unreleased; returns `true` for a duplicate
    ///
    /// A duplicate leaves the file untouched.
    pub fn add_entry(&self, path: &Path, section: &str, content: &str) -> Result<bool> {
        let text = read_changelog(path)?;
        let (updated, is_duplicate) = self.add_entry_to_text(&text, section, content)?;
        if !is_duplicate {
            write_atomic(path, &updated)?;
            info!(path = %path.display(), section, "added changelog entry");
        }
        Ok(is_duplicate)
    }

    /// Cut a release into the changelog file
    pub fn release(&self, path: &Path, new_version: &str, date: Option<NaiveDate>) -> Result<()> {
        let text = read_changelog(path)?;
        let updated = self.release_text(&text, new_version, date)?;
        write_atomic(path, &updated)?;
        info!(path = %path.display(), version = new_version, "released changelog section");
        Ok(())
    }

    /// Rewrite the file in canonical form; returns whether anything changed
    ///
    /// With `check` set the file is only compared, never written.
    pub fn format_file(&self, path: &Path, check: bool) -> Result<bool> {
        let text = read_changelog(path)?;
        let formatted = formatter::format(&text);
        let changed = formatted != text;
        if changed && !check {
            write_atomic(path, &formatted)?;
        }
        Ok(changed)
    }

    pub fn add_entry_to_text(
        &self,
        text: &str,
        section: &str,
        content: &str,
    ) -> Result<(String, bool)> {
        let mut doc = parser::parse(text);
        let is_duplicate = merger::add_entry(&mut doc, section, content)?;
        if let Some(target) = &self.link_target {
            doc.links = links::rebuild(&doc, None, target);
        }
        Ok((formatter::format(&doc.render()), is_duplicate))
    }

    pub fn release_text(
        &self,
        text: &str,
        new_version: &str,
        date: Option<NaiveDate>,
    ) -> Result<String> {
        let mut doc = parser::parse_strict(text)?;
        release::release(&mut doc, new_version, date)?;
        if let Some(target) = &self.link_target {
            doc.links = links::rebuild(&doc, Some(new_version), target);
        }
        debug!(releases = doc.releases.len(), "release applied");
        Ok(formatter::format(&doc.render()))
    }
}

/// Read the changelog, reporting a missing file as [`ChangelogError::NotFound`]
pub fn read_changelog(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ChangelogError::NotFound(path.to_path_buf()),
        _ => ChangelogError::Io(e),
    })
}

/// Directory temporary files are created in, next to `path`
fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Write through a temporary file in the same directory, then rename it over
/// `path`. The original file's permissions are carried over.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
