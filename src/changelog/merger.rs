use crate::domain::{ChangelogDocument, SectionKind};
use crate::error::{ChangelogError, Result};
use tracing::debug;

/// Merge an entry into the Unreleased section
///
/// Returns `Ok(true)` when an identical entry already exists, in which case
/// the document is left as it was. The Unreleased heading is synthesized when
/// absent, and its subsections are put back in canonical order either way.
pub fn add_entry(doc: &mut ChangelogDocument, section_name: &str, content: &str) -> Result<bool> {
    let kind: SectionKind = section_name.parse()?;
    let content = normalize_entry(content)?;
    let content = content.as_str();
    let unreleased = doc.unreleased_mut();

    let is_duplicate = unreleased
        .entries(kind)
        .iter()
        .any(|existing| existing == content);

    if is_duplicate {
        debug!(section = %kind, content, "entry already present");
    } else {
        unreleased.entries_mut(kind).push(content.to_string());
        debug!(section = %kind, content, "entry added");
    }

    unreleased.sort_sections();
    Ok(is_duplicate)
}

/// Bring entry text into the form it is written to and parsed back from
///
/// Surrounding and trailing whitespace is dropped, blank lines are removed and
/// every line after the first is indented so it continues the bullet.
pub fn normalize_entry(content: &str) -> Result<String> {
    let mut lines = content
        .trim()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty());

    let mut entry = lines.next().ok_or(ChangelogError::EmptyEntry)?.to_string();
    for line in lines {
        entry.push('\n');
        if !line.starts_with(char::is_whitespace) {
            entry.push_str("  ");
        }
        entry.push_str(line);
    }
    Ok(entry)
}
