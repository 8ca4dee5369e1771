//! Next-version computation
//!
//! The bump is derived from the categories of the new entries: `Added` or
//! `Changed` raise the minor version, anything else raises the patch
//! version. The scheme has no breaking-change category, so there is no
//! major bump path.

use tracing::debug;

use keepachange_core::error::VersionError;

use crate::types::{AggregatedChanges, Version};

/// Initial version used when the changelog has no releases yet
const INITIAL_VERSION: &str = "1.0.0";

/// Compute the next version number from the newly aggregated changes and
/// the previous version sections (most recent first).
///
/// The most recent previous version must be a plain `MAJOR.MINOR.PATCH`
/// release number; pre-release or build suffixes cannot serve as a bump
/// base and yield [`VersionError::NotReleaseVersion`].
pub fn compute_next_version(
    new_changes: &AggregatedChanges,
    previous_versions: &[Version],
) -> Result<String, VersionError> {
    let Some(last) = previous_versions.first() else {
        return Ok(INITIAL_VERSION.to_string());
    };

    let base = parse_release(&last.number)?;
    let next = if new_changes.contains("Changed") || new_changes.contains("Added") {
        format!("{}.{}.0", base.major, base.minor + 1)
    } else {
        format!("{}.{}.{}", base.major, base.minor, base.patch + 1)
    };

    debug!(base = %last.number, next = %next, "computed next version");
    Ok(next)
}

/// Parse a strict three-part release version
fn parse_release(number: &str) -> Result<semver::Version, VersionError> {
    let version = semver::Version::parse(number)
        .map_err(|e| VersionError::ParseFailed(number.to_string(), e.to_string()))?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(VersionError::NotReleaseVersion(number.to_string()));
    }
    Ok(version)
}
