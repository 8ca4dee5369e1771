//! Error types for keepachange

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using KeepachangeError
pub type Result<T> = std::result::Result<T, KeepachangeError>;

/// Main error type for keepachange operations
#[derive(Debug, Error)]
pub enum KeepachangeError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Change-entry fragment errors
    #[error(transparent)]
    Entries(#[from] EntriesError),

    /// Changelog file errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading change-entry fragments
#[derive(Debug, Error)]
pub enum EntriesError {
    /// Fragment path could not be read
    #[error("Failed to read change entries from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fragment content is not a well-formed YAML list
    #[error("Failed to parse change entries in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A fragment record is missing a required field
    #[error("Malformed change entry in {path}: missing field `{field}`")]
    Malformed { path: PathBuf, field: &'static str },
}

/// Errors raised while reading or rewriting the changelog file
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file could not be read
    #[error("Failed to read changelog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Changelog file could not be written
    #[error("Failed to write changelog file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse a version number
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Previous version is not a plain MAJOR.MINOR.PATCH release number
    #[error("Cannot compute next version from '{0}': expected major, minor and patch parts")]
    NotReleaseVersion(String),
}

impl KeepachangeError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
