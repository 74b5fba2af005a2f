pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;

pub use changelog::ChangelogEngine;
pub use domain::{Version, VersionBump};
pub use error::{ChangelogError, Result};
