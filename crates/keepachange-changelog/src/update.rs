//! Changelog update orchestration

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{info, instrument};

use keepachange_core::error::{ChangelogError, Result};

use crate::entries::{self, aggregate};
use crate::parser;
use crate::types::{Version, VersionLink};
use crate::version::compute_next_version;
use crate::writer::ChangelogWriter;

/// Result of an update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No change entries were found; the changelog was left untouched
    NoChanges,
    /// A new version section was merged into the changelog
    Updated {
        /// The released version number, explicit or computed
        version: String,
    },
}

/// Merges unreleased change fragments into a changelog file.
///
/// The whole operation is read-then-write over one target file: fragments
/// are loaded and aggregated, the existing changelog is parsed, a new
/// version section is prepended and the file is rewritten as a whole.
/// Concurrent invocations against the same file are not coordinated and
/// must be serialized by the caller.
pub struct ChangelogUpdater {
    changelog_file: PathBuf,
    fragments: PathBuf,
    date: Option<DateTime<Utc>>,
    version: Option<String>,
    version_url_pattern: Option<String>,
}

impl ChangelogUpdater {
    /// Create an updater for a changelog file and a fragment file or
    /// directory
    pub fn new(changelog_file: impl Into<PathBuf>, fragments: impl Into<PathBuf>) -> Self {
        Self {
            changelog_file: changelog_file.into(),
            fragments: fragments.into(),
            date: None,
            version: None,
            version_url_pattern: None,
        }
    }

    /// Use an explicit version number instead of computing one
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Use an explicit release date instead of the current time
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Write version headings in link style and append a reference link
    /// for the new version, substituting it into `pattern` at the `{}` or
    /// `{version}` placeholder
    pub fn with_version_urls(mut self, pattern: impl Into<String>) -> Self {
        self.version_url_pattern = Some(pattern.into());
        self
    }

    /// Merge the fragments into the changelog file.
    ///
    /// Without fragments this is a no-op and the file is left untouched.
    /// All failures surface before the file is written, so a failed run
    /// never corrupts the target.
    #[instrument(skip(self), fields(changelog = %self.changelog_file.display()))]
    pub fn update(&self) -> Result<UpdateOutcome> {
        match self.prepare()? {
            Prepared::NoChanges => Ok(UpdateOutcome::NoChanges),
            Prepared::Render { version, output } => {
                write_replacing(&self.changelog_file, &output)?;
                info!(version = %version, "changelog updated");
                Ok(UpdateOutcome::Updated { version })
            }
        }
    }

    /// Render the updated changelog without touching the file
    pub fn preview(&self) -> Result<Option<String>> {
        match self.prepare()? {
            Prepared::NoChanges => Ok(None),
            Prepared::Render { output, .. } => Ok(Some(output)),
        }
    }

    /// The version the next update run would release, computed from the
    /// new entries and the existing changelog when no explicit version is
    /// set
    pub fn next_version(&self) -> Result<Option<String>> {
        match self.prepare()? {
            Prepared::NoChanges => Ok(None),
            Prepared::Render { version, .. } => Ok(Some(version)),
        }
    }

    fn prepare(&self) -> Result<Prepared> {
        let entries = entries::load(&self.fragments)?;
        let changes = aggregate(&entries);
        if changes.is_empty() {
            info!(fragments = %self.fragments.display(), "no change entries found, nothing to do");
            return Ok(Prepared::NoChanges);
        }

        let document = parser::parse_file(&self.changelog_file)?;

        let number = match self.explicit_version() {
            Some(version) => version.to_string(),
            None => {
                let computed = compute_next_version(&changes, &document.versions)?;
                info!(version = %computed, "using computed next version");
                computed
            }
        };

        let date = self.date.unwrap_or_else(Utc::now);
        let new_version = Version::new(number.clone(), date, changes);

        let mut versions = Vec::with_capacity(document.versions.len() + 1);
        versions.push(new_version);
        versions.extend(document.versions);

        let mut links = document.links;
        let link_style = self.url_pattern().is_some();
        if let Some(pattern) = self.url_pattern() {
            links.push(VersionLink::new(
                number.clone(),
                expand_url_pattern(pattern, &number),
            ));
        }

        let writer = ChangelogWriter::new().with_link_style(link_style);
        let output = writer.render(&document.header, &versions, &links);

        Ok(Prepared::Render {
            version: number,
            output,
        })
    }

    /// The explicit version, treating blank values as unset
    fn explicit_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// The URL pattern, treating blank values as unset
    fn url_pattern(&self) -> Option<&str> {
        self.version_url_pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

enum Prepared {
    NoChanges,
    Render { version: String, output: String },
}

/// Substitute the version into a URL pattern at the `{version}` or `{}`
/// placeholder. A pattern without a placeholder is returned unchanged.
fn expand_url_pattern(pattern: &str, version: &str) -> String {
    if pattern.contains("{version}") {
        pattern.replace("{version}", version)
    } else {
        pattern.replacen("{}", version, 1)
    }
}

/// Replace the target file's content as a whole, going through a temp file
/// in the same directory so a crash mid-write cannot truncate the target.
fn write_replacing(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |source: std::io::Error| ChangelogError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const CHANGELOG: &str = "\
# Changelog
All notable changes to this project will be documented in this file.

## 2.11.1 - 2020-12-07
### Fixed
- Initialization of new git repository

## 2.11.0 - 2020-12-04
### Added
- Repository import via URL for git
";

    const CHANGELOG_WITH_LINKS: &str = "\
# Changelog

## [2.11.1] - 2020-12-07
### Fixed
- Initialization of new git repository

## [2.11.0] - 2020-12-04
### Added
- Repository import via URL for git

[2.11.0]: https://www.scm-manager.org/download/2.11.0
[2.11.1]: https://www.scm-manager.org/download/2.11.1
";

    fn release_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 12, 15, 10, 15, 30).unwrap()
    }

    fn write_fragments(dir: &Path) {
        std::fs::write(
            dir.join("a-fix.yaml"),
            "- type: fixed\n  description: Crash when branch names contain spaces\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("b-change.yaml"),
            "- type: changed\n  description: Faster repository indexing\n",
        )
        .unwrap();
    }

    struct Fixture {
        _temp: TempDir,
        changelog: PathBuf,
        fragments: PathBuf,
    }

    fn fixture(changelog_content: &str) -> Fixture {
        let temp = TempDir::new().unwrap();
        let changelog = temp.path().join("CHANGELOG.md");
        std::fs::write(&changelog, changelog_content).unwrap();
        let fragments = temp.path().join("unreleased");
        std::fs::create_dir(&fragments).unwrap();
        Fixture {
            changelog,
            fragments,
            _temp: temp,
        }
    }

    #[test]
    fn test_update_with_explicit_version() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let outcome = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("3.0.0")
            .with_date(release_date())
            .update()
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: "3.0.0".to_string()
            }
        );
        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert!(content.contains("## 3.0.0 - 2020-12-15"));
    }

    #[test]
    fn test_update_computes_minor_version_and_orders_sections() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let outcome = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_date(release_date())
            .update()
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: "2.12.0".to_string()
            }
        );

        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let position = |needle: &str| {
            lines
                .iter()
                .position(|l| *l == needle)
                .unwrap_or_else(|| panic!("missing line: {needle}"))
        };

        // new version first, categories in priority order, old sections kept
        assert!(position("## 2.12.0 - 2020-12-15") < position("### Fixed"));
        assert!(position("### Fixed") < position("### Changed"));
        assert!(position("### Changed") < position("## 2.11.1 - 2020-12-07"));
        assert!(position("## 2.11.1 - 2020-12-07") < position("## 2.11.0 - 2020-12-04"));
        assert!(content.contains("- Faster repository indexing\n"));
        assert!(content.contains("- Crash when branch names contain spaces\n"));
        // old content survives verbatim
        assert!(content.contains("- Initialization of new git repository\n"));
        assert!(content.contains("- Repository import via URL for git\n"));
        assert!(content.starts_with("# Changelog\n"));
    }

    #[test]
    fn test_update_without_fragments_is_a_noop() {
        let fx = fixture(CHANGELOG);

        let outcome = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .update()
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::NoChanges);
        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(content, CHANGELOG);
    }

    #[test]
    fn test_update_with_version_urls() {
        let fx = fixture(CHANGELOG_WITH_LINKS);
        write_fragments(&fx.fragments);

        ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("2.12.0")
            .with_date(release_date())
            .with_version_urls("https://www.scm-manager.org/download/{}")
            .update()
            .unwrap();

        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert!(content.contains("## [2.12.0] - 2020-12-15"));
        assert!(content.contains("## [2.11.1] - 2020-12-07"));
        assert!(content.ends_with(
            "[2.11.0]: https://www.scm-manager.org/download/2.11.0\n\
             [2.11.1]: https://www.scm-manager.org/download/2.11.1\n\
             [2.12.0]: https://www.scm-manager.org/download/2.12.0\n"
        ));
    }

    #[test]
    fn test_update_normalizes_mixed_case_categories() {
        let fx = fixture(CHANGELOG);
        std::fs::write(
            fx.fragments.join("one.yaml"),
            "- type: added\n  description: from lowercase\n",
        )
        .unwrap();
        std::fs::write(
            fx.fragments.join("two.yaml"),
            "- type: ADDED\n  description: from uppercase\n",
        )
        .unwrap();
        std::fs::write(
            fx.fragments.join("three.yaml"),
            "- type: Added\n  description: from capitalized\n",
        )
        .unwrap();

        ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("2.12.0")
            .with_date(release_date())
            .update()
            .unwrap();

        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(content.matches("### Added").count(), 2); // new section + 2.11.0
        assert!(!content.contains("### ADDED"));
        assert!(!content.contains("### added"));
        assert!(content.contains(
            "### Added\n- from lowercase\n- from capitalized\n- from uppercase\n"
        ));
    }

    #[test]
    fn test_update_fails_without_changelog_file() {
        let temp = TempDir::new().unwrap();
        let fragments = temp.path().join("unreleased");
        std::fs::create_dir(&fragments).unwrap();
        write_fragments(&fragments);

        let result = ChangelogUpdater::new(temp.path().join("CHANGELOG.md"), &fragments)
            .with_version("1.0.0")
            .update();

        assert!(result.is_err());
    }

    #[test]
    fn test_update_fails_before_write_on_bad_previous_version() {
        let fx = fixture("# Changelog\n\n## 2.11 - 2020-12-04\n");
        write_fragments(&fx.fragments);

        let result = ChangelogUpdater::new(&fx.changelog, &fx.fragments).update();

        assert!(result.is_err());
        // the target is untouched
        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(content, "# Changelog\n\n## 2.11 - 2020-12-04\n");
    }

    #[test]
    fn test_blank_explicit_version_falls_back_to_computed() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let outcome = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("  ")
            .with_date(release_date())
            .update()
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: "2.12.0".to_string()
            }
        );
    }

    #[test]
    fn test_next_version_does_not_write() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let next = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .next_version()
            .unwrap();

        assert_eq!(next.as_deref(), Some("2.12.0"));
        let content = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(content, CHANGELOG);
    }

    #[test]
    fn test_preview_matches_written_output() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let updater = ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("2.12.0")
            .with_date(release_date());

        let preview = updater.preview().unwrap().unwrap();
        updater.update().unwrap();
        let written = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(preview, written);
    }

    #[test]
    fn test_update_is_stable_when_reapplied() {
        let fx = fixture(CHANGELOG);
        write_fragments(&fx.fragments);

        let date = release_date();
        ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .with_version("2.12.0")
            .with_date(date)
            .update()
            .unwrap();
        let first = std::fs::read_to_string(&fx.changelog).unwrap();

        // the merged document round-trips: parsing and rewriting it with a
        // fresh (empty) fragment set must leave it untouched
        std::fs::remove_file(fx.fragments.join("a-fix.yaml")).unwrap();
        std::fs::remove_file(fx.fragments.join("b-change.yaml")).unwrap();
        ChangelogUpdater::new(&fx.changelog, &fx.fragments)
            .update()
            .unwrap();
        let second = std::fs::read_to_string(&fx.changelog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_url_pattern() {
        assert_eq!(
            expand_url_pattern("https://example.com/{}", "1.2.3"),
            "https://example.com/1.2.3"
        );
        assert_eq!(
            expand_url_pattern("https://example.com/{version}/notes", "1.2.3"),
            "https://example.com/1.2.3/notes"
        );
        assert_eq!(
            expand_url_pattern("https://example.com/latest", "1.2.3"),
            "https://example.com/latest"
        );
    }
}
