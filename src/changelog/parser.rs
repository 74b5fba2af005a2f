use crate::domain::{ChangelogDocument, LinkReference, ReleaseSection, SectionKind, UNRELEASED};
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static RELEASE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[([^\]]+)\](?: - (.+))?").expect("release heading regex is valid")
});

static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^### (Added|Changed|Deprecated|Removed|Fixed|Security)$")
        .expect("section heading regex is valid")
});

static LINK_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]: (.+)$").expect("link reference regex is valid")
});

/// Classification of a single changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    ReleaseHeading {
        token: &'a str,
        date: Option<&'a str>,
    },
    SectionHeading(SectionKind),
    Entry(&'a str),
    LinkReference {
        token: &'a str,
        url: &'a str,
    },
    Text(&'a str),
}

/// Classify one line; trailing whitespace is ignored
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();
    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = RELEASE_HEADING.captures(line) {
        if let Some(token) = caps.get(1) {
            let date = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|d| !d.is_empty());
            return Line::ReleaseHeading {
                token: token.as_str().trim(),
                date,
            };
        }
    }

    if let Some(caps) = SECTION_HEADING.captures(line) {
        if let Some(kind) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
            return Line::SectionHeading(kind);
        }
    }

    if let Some(entry) = line.strip_prefix("- ") {
        return Line::Entry(entry);
    }

    if let Some(caps) = LINK_REFERENCE.captures(line) {
        if let (Some(token), Some(url)) = (caps.get(1), caps.get(2)) {
            return Line::LinkReference {
                token: token.as_str(),
                url: url.as_str().trim(),
            };
        }
    }

    Line::Text(line)
}

/// `#` to `######` followed by a space
pub fn is_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Preamble,
    Unreleased,
    Release(usize),
}

/// Accumulates classified lines into a [`ChangelogDocument`]
struct DocumentBuilder {
    doc: ChangelogDocument,
    cursor: Cursor,
    section: Option<SectionKind>,
    /// An indented line right after an entry continues that entry
    continuing: bool,
}

impl DocumentBuilder {
    fn new() -> Self {
        DocumentBuilder {
            doc: ChangelogDocument::default(),
            cursor: Cursor::Preamble,
            section: None,
            continuing: false,
        }
    }

    fn current(&mut self) -> Option<&mut ReleaseSection> {
        match self.cursor {
            Cursor::Preamble => None,
            Cursor::Unreleased => Some(self.doc.unreleased_mut()),
            Cursor::Release(index) => self.doc.releases.get_mut(index),
        }
    }

    fn push_preamble(&mut self, raw: &str) {
        if raw.is_empty() && self.doc.preamble.is_empty() {
            return;
        }
        self.doc.preamble.push(raw.to_string());
    }

    fn push_note(&mut self, raw: &str) {
        if let Some(release) = self.current() {
            release.notes.push(raw.to_string());
        }
    }

    fn accept(&mut self, raw: &str) {
        let raw = raw.trim_end();
        match classify(raw) {
            Line::Blank => {
                self.continuing = false;
                if self.cursor == Cursor::Preamble {
                    self.push_preamble("");
                }
            }
            Line::LinkReference { token, url } => {
                self.continuing = false;
                self.doc.links.push(LinkReference::new(token, url));
            }
            Line::ReleaseHeading { token, date } => {
                self.continuing = false;
                self.section = None;
                if token == UNRELEASED {
                    self.doc.unreleased_mut();
                    self.cursor = Cursor::Unreleased;
                } else {
                    self.doc
                        .releases
                        .push(ReleaseSection::new(token, date.map(str::to_string)));
                    self.cursor = Cursor::Release(self.doc.releases.len() - 1);
                }
            }
            Line::SectionHeading(kind) => {
                self.continuing = false;
                if self.cursor == Cursor::Preamble {
                    self.push_preamble(raw);
                    return;
                }
                self.section = Some(kind);
                if let Some(release) = self.current() {
                    release.entries_mut(kind);
                }
            }
            Line::Entry(text) => {
                if self.cursor == Cursor::Preamble {
                    self.push_preamble(raw);
                    return;
                }
                match self.section {
                    Some(kind) => {
                        if let Some(release) = self.current() {
                            release.entries_mut(kind).push(text.to_string());
                        }
                        self.continuing = true;
                    }
                    None => self.push_note(raw),
                }
            }
            Line::Text(text) => {
                if self.cursor == Cursor::Preamble {
                    self.push_preamble(text);
                    return;
                }
                let indented = text.starts_with(char::is_whitespace);
                if self.continuing && indented {
                    if let Some(kind) = self.section {
                        if let Some(entry) = self
                            .current()
                            .and_then(|release| release.entries_mut(kind).last_mut())
                        {
                            entry.push('\n');
                            entry.push_str(text);
                            return;
                        }
                    }
                }
                self.continuing = false;
                // bullets under a heading outside the vocabulary stay notes
                if is_heading(text) {
                    self.section = None;
                }
                self.push_note(text);
            }
        }
    }

    fn finish(mut self) -> ChangelogDocument {
        while self.doc.preamble.last().is_some_and(|l| l.is_empty()) {
            self.doc.preamble.pop();
        }
        self.doc
    }
}

/// Parse changelog text, tolerating a missing Unreleased heading
pub fn parse(text: &str) -> ChangelogDocument {
    let mut builder = DocumentBuilder::new();
    for line in text.lines() {
        builder.accept(line);
    }
    builder.finish()
}

/// Parse changelog text and require a `## [Unreleased]` heading
pub fn parse_strict(text: &str) -> Result<ChangelogDocument> {
    let doc = parse(text);
    doc.require_unreleased()?;
    Ok(doc)
}
