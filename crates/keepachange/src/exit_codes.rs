//! Exit codes for the CLI

#![allow(dead_code)]

use keepachange_core::KeepachangeError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Changelog or fragment error
pub const CHANGELOG_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Map an error to the exit code of its domain
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<KeepachangeError>() {
        Some(KeepachangeError::Config(_)) => CONFIG_ERROR,
        Some(KeepachangeError::Entries(_)) | Some(KeepachangeError::Changelog(_)) => {
            CHANGELOG_ERROR
        }
        Some(KeepachangeError::Version(_)) => VERSION_ERROR,
        Some(_) | None => ERROR,
    }
}
