//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path
    pub file: PathBuf,

    /// Root path of the unreleased change fragments (file or directory)
    pub fragments: PathBuf,

    /// URL pattern for version links, with a `{}` or `{version}`
    /// placeholder. When set, version headings are written in link style
    /// and a reference link line is appended for each new version.
    pub version_url_pattern: Option<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            fragments: PathBuf::from("changelogs/unreleased"),
            version_url_pattern: None,
        }
    }
}

impl ChangelogConfig {
    /// The effective URL pattern, treating blank values as unset
    pub fn url_pattern(&self) -> Option<&str> {
        self.version_url_pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
