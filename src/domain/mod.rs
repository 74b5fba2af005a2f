//! Domain logic - pure values independent of files and git operations

pub mod document;
pub mod section;
pub mod version;

pub use document::{ChangelogDocument, LinkReference, ReleaseSection, UNRELEASED};
pub use section::SectionKind;
pub use version::{Version, VersionBump};
