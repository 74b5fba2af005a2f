//! Changelog document engine
//!
//! Data flows one way: text is parsed into a [`ChangelogDocument`], entries
//! are merged or cut into a release, the link block is regenerated and the
//! result is rendered back through the canonical formatter.
//!
//! [`ChangelogDocument`]: crate::domain::ChangelogDocument

pub mod engine;
pub mod formatter;
pub mod links;
pub mod merger;
pub mod parser;
pub mod release;

pub use engine::{latest_released_version, read_changelog, skeleton, ChangelogEngine};
pub use links::{LinkTarget, Provider};
