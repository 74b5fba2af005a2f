use crate::domain::{ChangelogDocument, ReleaseSection, Version};
use crate::error::{ChangelogError, Result};
use chrono::{Local, NaiveDate};
use std::cmp::Ordering;
use tracing::debug;

/// Today's date as used for release headings
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Cut the Unreleased entries into a new dated release
///
/// The new section is placed first among the releases, directly under the
/// Unreleased heading, which stays in place with no entries left.
pub fn release(
    doc: &mut ChangelogDocument,
    new_version: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let new_version = new_version.trim();
    if new_version.is_empty() {
        return Err(ChangelogError::NoVersionToken);
    }
    if is_released(doc, new_version) {
        return Err(ChangelogError::AlreadyReleased(new_version.to_string()));
    }

    let date = date.unwrap_or_else(today).format("%Y-%m-%d").to_string();
    let unreleased = doc.unreleased_mut();

    let mut section = ReleaseSection::new(new_version, Some(date));
    section.notes = std::mem::take(&mut unreleased.notes);
    section.sections = std::mem::take(&mut unreleased.sections);
    section.sort_sections();

    debug!(
        version = new_version,
        entries = section.entry_count(),
        "moved unreleased entries into release"
    );
    doc.releases.insert(0, section);
    Ok(())
}

/// A token counts as released when it matches a heading verbatim or
/// numerically (so "v1.2.0" and "1.2.0" collide).
fn is_released(doc: &ChangelogDocument, token: &str) -> bool {
    if doc.find_release(token).is_some() {
        return true;
    }
    let Ok(version) = Version::parse(token) else {
        return false;
    };
    doc.releases.iter().any(|release| {
        Version::parse(&release.version_token)
            .map(|existing| existing.compare(&version) == Ordering::Equal)
            .unwrap_or(false)
    })
}
