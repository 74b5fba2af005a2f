use crate::changelog::{LinkTarget, Provider};
use crate::domain::Version;
use crate::error::{ChangelogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = ".git-changelog.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = "git-changelog.toml";

/// Represents the complete configuration for git-changelog.
///
/// Contains the changelog location, link provider settings, version prefix policy, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_provider() -> String {
    "github".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

/// Location of the changelog file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
        }
    }
}

/// Hosting details used to build comparison links.
///
/// When `slug` is absent it is inferred from the URL of `remote`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            provider: default_provider(),
            slug: None,
            remote: default_remote(),
        }
    }
}

impl RepositoryConfig {
    /// Resolve the link target from the configured slug, falling back to a
    /// remote URL when no slug is configured.
    pub fn link_target(&self, remote_url: Option<&str>) -> Option<LinkTarget> {
        match self.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(slug) => Some(LinkTarget::new(Provider::from_name(&self.provider), slug)),
            None => remote_url.and_then(LinkTarget::from_remote_url),
        }
    }
}

/// Whether new version tokens carry a `v` prefix.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrefixPolicy {
    /// Follow the prefix of the current tag
    #[default]
    Auto,
    Always,
    Never,
}

impl PrefixPolicy {
    pub fn apply(&self, version: &Version) -> String {
        let include_prefix = match self {
            PrefixPolicy::Auto => version.had_prefix,
            PrefixPolicy::Always => true,
            PrefixPolicy::Never => false,
        };
        version.format(include_prefix)
    }
}

/// Configuration for version token formatting.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct VersioningConfig {
    #[serde(default)]
    pub prefix: PrefixPolicy,
}

/// Configuration for behavior customization.
///
/// Controls what the bump workflow does around the changelog write.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub require_clean: bool,

    #[serde(default = "default_true")]
    pub commit: bool,

    #[serde(default = "default_true")]
    pub tag: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            require_clean: true,
            commit: true,
            tag: true,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.git-changelog.toml` in current directory
/// 3. `git-changelog.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| ChangelogError::config(e.to_string()))
}
