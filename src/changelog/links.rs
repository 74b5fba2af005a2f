//! Comparison-link block generation
//!
//! The block at the bottom of the changelog is always regenerated from the
//! release headings, never edited line by line:
//!
//! ```text
//! [Unreleased]: https://github.com/owner/repo/compare/1.2.0...HEAD
//! [1.2.0]: https://github.com/owner/repo/compare/1.1.0...1.2.0
//! [1.1.0]: https://github.com/owner/repo/compare/1.0.0...1.1.0
//! [1.0.0]: https://github.com/owner/repo/releases/tag/1.0.0
//! ```

use crate::domain::{ChangelogDocument, LinkReference, Version, UNRELEASED};
use tracing::{debug, warn};

/// Hosting service used to build comparison URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    GitHub,
    Bitbucket,
}

impl Provider {
    /// Look up a provider by name. Unknown names fall back to GitHub so that
    /// link generation never blocks a release.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "github" => Provider::GitHub,
            "bitbucket" => Provider::Bitbucket,
            other => {
                warn!(provider = other, "unknown link provider, using github");
                Provider::GitHub
            }
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Provider::GitHub => "https://github.com",
            Provider::Bitbucket => "https://bitbucket.org",
        }
    }
}

/// Where comparison links point: a provider plus an `owner/repo` slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub provider: Provider,
    pub slug: String,
}

impl LinkTarget {
    pub fn new(provider: Provider, slug: impl Into<String>) -> Self {
        LinkTarget {
            provider,
            slug: slug.into().trim_matches('/').to_string(),
        }
    }

    /// Derive a target from a remote URL such as `git@github.com:owner/repo.git`
    /// or `https://bitbucket.org/owner/repo`.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let rest = if let Some(rest) = url.split_once("://").map(|(_, rest)| rest) {
            // drop optional user info, then the host
            let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
            rest.split_once('/')?
        } else {
            let rest = url.rsplit_once('@').map(|(_, r)| r).unwrap_or(url);
            rest.split_once(':')?
        };
        let (host, path) = rest;

        let slug = path.trim_end_matches('/').trim_end_matches(".git");
        if slug.split('/').filter(|s| !s.is_empty()).count() < 2 {
            return None;
        }

        let provider = if host.contains("bitbucket") {
            Provider::Bitbucket
        } else {
            Provider::GitHub
        };
        Some(LinkTarget::new(provider, slug))
    }

    pub fn base_url(&self) -> String {
        format!("{}/{}", self.provider.host(), self.slug)
    }
}

/// Regenerate the link block for every release heading plus `new_version`
///
/// Tokens that do not parse as versions get no link. The result is ordered
/// highest version first.
pub fn rebuild(
    doc: &ChangelogDocument,
    new_version: Option<&str>,
    target: &LinkTarget,
) -> Vec<LinkReference> {
    let mut tokens: Vec<&str> = Vec::new();
    let candidates = doc
        .releases
        .iter()
        .map(|r| r.version_token.as_str())
        .chain(new_version.map(str::trim).filter(|t| !t.is_empty()));
    for token in candidates {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    let mut versions: Vec<(&str, Version)> = tokens
        .into_iter()
        .filter_map(|token| match Version::parse(token) {
            Ok(version) => Some((token, version)),
            Err(_) => {
                warn!(token, "release heading is not a version, no link generated");
                None
            }
        })
        .collect();
    versions.sort_by(|(_, a), (_, b)| b.compare(a));

    let base = target.base_url();
    let mut links = Vec::with_capacity(versions.len() + 1);

    let Some((highest, _)) = versions.first() else {
        return links;
    };
    links.push(LinkReference::new(
        UNRELEASED,
        format!("{}/compare/{}...HEAD", base, highest),
    ));

    for pair in versions.windows(2) {
        let (newer, older) = (pair[0].0, pair[1].0);
        links.push(LinkReference::new(
            newer,
            format!("{}/compare/{}...{}", base, older, newer),
        ));
    }

    if let Some((lowest, _)) = versions.last() {
        links.push(LinkReference::new(
            *lowest,
            format!("{}/releases/tag/{}", base, lowest),
        ));
    }

    debug!(count = links.len(), base = %base, "rebuilt link block");
    links
}
