use crate::error::{ChangelogError, Result};
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;
use std::fmt;

/// Semantic version as it appears in tags and changelog headings
///
/// Remembers whether the source text carried a `v` prefix so callers can
/// choose to reproduce it. Ordering via [`Version::compare`] looks only at the
/// numeric triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
    pub build: BuildMetadata,
    pub had_prefix: bool,
}

impl Version {
    /// Create a new version without prefix or metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
            had_prefix: false,
        }
    }

    /// Parse a version string (e.g., "v1.2.3-rc.1+build.5")
    ///
    /// Empty input parses to `0.0.0`, which lets a repository without tags
    /// start from a zero version.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Version::new(0, 0, 0));
        }

        let (had_prefix, rest) = match text.strip_prefix('v') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (rest, build) = match rest.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (rest, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(ChangelogError::version(text));
        }

        let major = parse_numeric(parts[0]).ok_or_else(|| ChangelogError::version(text))?;
        let minor = parse_numeric(parts[1]).ok_or_else(|| ChangelogError::version(text))?;
        let patch = parse_numeric(parts[2]).ok_or_else(|| ChangelogError::version(text))?;

        let pre = match pre {
            Some("") => return Err(ChangelogError::version(text)),
            Some(pre) => Prerelease::new(pre).map_err(|_| ChangelogError::version(text))?,
            None => Prerelease::EMPTY,
        };
        let build = match build {
            Some("") => return Err(ChangelogError::version(text)),
            Some(build) => BuildMetadata::new(build).map_err(|_| ChangelogError::version(text))?,
            None => BuildMetadata::EMPTY,
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre,
            build,
            had_prefix,
        })
    }

    /// Bump version according to bump type
    ///
    /// The result never carries prerelease or build metadata. The prefix flag
    /// is kept so `format(self.had_prefix)` stays in the same style.
    ///
    /// Fails with [`ChangelogError::InvalidVersionFormat`] when the bumped
    /// component would overflow.
    pub fn bump(&self, bump_type: &VersionBump) -> Result<Self> {
        let overflow = || ChangelogError::version(self.to_string());
        let (major, minor, patch) = match bump_type {
            VersionBump::Major => (self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            VersionBump::Minor => (self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0),
            VersionBump::Patch => (
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };

        Ok(Version {
            had_prefix: self.had_prefix,
            ..Version::new(major, minor, patch)
        })
    }

    /// Render the version, with or without a leading `v`
    pub fn format(&self, include_prefix: bool) -> String {
        let mut out = String::new();
        if include_prefix {
            out.push('v');
        }
        out.push_str(&format!("{}.{}.{}", self.major, self.minor, self.patch));
        if !self.pre.is_empty() {
            out.push('-');
            out.push_str(self.pre.as_str());
        }
        if !self.build.is_empty() {
            out.push('+');
            out.push_str(self.build.as_str());
        }
        out
    }

    /// Compare by major, minor, patch only
    pub fn compare(&self, other: &Version) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

/// Digits only, and no leading zero unless the component is exactly "0"
fn parse_numeric(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse::<u64>().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(self.had_prefix))
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl std::str::FromStr for VersionBump {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(ChangelogError::config(format!(
                "Unknown bump kind '{}' - expected major, minor or patch",
                other
            ))),
        }
    }
}
