//! Structured model of a Keep a Changelog document

use super::section::SectionKind;
use crate::error::{ChangelogError, Result};
use std::fmt;

/// Bracket token of the staging section
pub const UNRELEASED: &str = "Unreleased";

/// One `[token]: url` line of the trailing link block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub token: String,
    pub url: String,
}

impl LinkReference {
    pub fn new(token: impl Into<String>, url: impl Into<String>) -> Self {
        LinkReference {
            token: token.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for LinkReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.token, self.url)
    }
}

/// A `## [token] - date` block and everything under it
///
/// Sections keep the order they were encountered in; only the Unreleased
/// section is normalized to canonical order when entries are merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseSection {
    pub version_token: String,
    pub date: Option<String>,
    /// Free text under the heading that is not part of any subsection
    pub notes: Vec<String>,
    pub sections: Vec<(SectionKind, Vec<String>)>,
}

impl ReleaseSection {
    pub fn new(version_token: impl Into<String>, date: Option<String>) -> Self {
        ReleaseSection {
            version_token: version_token.into(),
            date,
            ..Default::default()
        }
    }

    pub fn unreleased() -> Self {
        ReleaseSection::new(UNRELEASED, None)
    }

    /// Entries of a subsection, empty when the subsection is absent
    pub fn entries(&self, kind: SectionKind) -> &[String] {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Entries of a subsection, creating it at the end when absent
    pub fn entries_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        let index = match self.sections.iter().position(|(k, _)| *k == kind) {
            Some(index) => index,
            None => {
                self.sections.push((kind, Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    /// Stable reorder into Added, Changed, Deprecated, Removed, Fixed, Security
    pub fn sort_sections(&mut self) {
        self.sections.sort_by_key(|(kind, _)| kind.rank());
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0 && self.notes.is_empty()
    }

    pub fn heading(&self) -> String {
        match &self.date {
            Some(date) => format!("## [{}] - {}", self.version_token, date),
            None => format!("## [{}]", self.version_token),
        }
    }

    fn render_into(&self, out: &mut Vec<String>) {
        out.push(self.heading());
        out.push(String::new());
        if !self.notes.is_empty() {
            out.extend(self.notes.iter().cloned());
            out.push(String::new());
        }
        for (kind, entries) in &self.sections {
            if entries.is_empty() {
                continue;
            }
            out.push(format!("### {}", kind));
            out.push(String::new());
            out.extend(entries.iter().map(|entry| format!("- {}", entry)));
            out.push(String::new());
        }
    }
}

/// The whole changelog file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangelogDocument {
    /// Everything before the first `##` heading, verbatim
    pub preamble: Vec<String>,
    pub unreleased: Option<ReleaseSection>,
    /// Most recent first, in file order
    pub releases: Vec<ReleaseSection>,
    pub links: Vec<LinkReference>,
}

impl ChangelogDocument {
    /// Fail unless the source had a `## [Unreleased]` heading
    pub fn require_unreleased(&self) -> Result<&ReleaseSection> {
        self.unreleased
            .as_ref()
            .ok_or_else(|| ChangelogError::malformed("missing `## [Unreleased]` heading"))
    }

    /// The Unreleased section, synthesized empty when absent
    pub fn unreleased_mut(&mut self) -> &mut ReleaseSection {
        self.unreleased.get_or_insert_with(ReleaseSection::unreleased)
    }

    pub fn find_release(&self, token: &str) -> Option<&ReleaseSection> {
        self.releases.iter().find(|r| r.version_token == token)
    }

    /// Serialize the model; pass the result through the canonical formatter
    /// before writing.
    pub fn render(&self) -> String {
        let mut out: Vec<String> = self.preamble.clone();
        out.push(String::new());

        if let Some(unreleased) = &self.unreleased {
            unreleased.render_into(&mut out);
        }
        for release in &self.releases {
            release.render_into(&mut out);
        }

        if !self.links.is_empty() {
            out.push(String::new());
            out.extend(self.links.iter().map(|link| link.to_string()));
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}
