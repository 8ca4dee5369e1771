//! keepachange Core - Shared foundation for the keepachange tools
//!
//! This crate provides the error taxonomy and configuration handling used
//! by the changelog library and the CLI.

pub mod config;
pub mod error;

pub use error::{
    ChangelogError, ConfigError, EntriesError, KeepachangeError, Result, VersionError,
};
