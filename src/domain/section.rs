use crate::error::{ChangelogError, Result};
use std::fmt;
use std::str::FromStr;

/// Subsection of a release, from the fixed Keep a Changelog vocabulary
///
/// Declaration order is the canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl SectionKind {
    /// All sections in canonical order
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Added,
        SectionKind::Changed,
        SectionKind::Deprecated,
        SectionKind::Removed,
        SectionKind::Fixed,
        SectionKind::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Added => "Added",
            SectionKind::Changed => "Changed",
            SectionKind::Deprecated => "Deprecated",
            SectionKind::Removed => "Removed",
            SectionKind::Fixed => "Fixed",
            SectionKind::Security => "Security",
        }
    }

    /// Position in the canonical order
    pub fn rank(&self) -> usize {
        SectionKind::ALL
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(SectionKind::ALL.len())
    }
}

impl FromStr for SectionKind {
    type Err = ChangelogError;

    /// Case-sensitive: "added" is not a section name
    fn from_str(s: &str) -> Result<Self> {
        SectionKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| ChangelogError::UnknownSection(s.to_string()))
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
