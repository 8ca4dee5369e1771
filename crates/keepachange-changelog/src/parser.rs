//! Changelog parsing
//!
//! A single-pass, line-oriented state machine over trimmed lines. The
//! parser is deliberately permissive: lines that match no known shape are
//! kept verbatim while the header is open and dropped silently afterwards.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use tracing::debug;

use keepachange_core::error::ChangelogError;

use crate::types::{
    AggregatedChanges, Change, ChangelogDocument, Version, VersionLink, DATE_FORMAT,
};

/// Regex for version headings, `## [1.2.3] - 2020-12-04` (brackets optional)
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+\[?([0-9.]+(?:-[^\]\s]*)?)\]? - (\d{4}-\d{2}-\d{2})$")
        .expect("invalid regex")
});

/// Regex for category headings, `### Added`
static CATEGORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(.*)$").expect("invalid regex"));

/// Regex for change lines, `- some description`
static CHANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+(.*)$").expect("invalid regex"));

/// Regex for reference links, `[1.2.3]: https://...`
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([0-9.]+(?:-.*)?)\]:\s+(.+)$").expect("invalid regex"));

/// Parse a changelog file into a document
pub fn parse_file(path: &Path) -> Result<ChangelogDocument, ChangelogError> {
    let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&content))
}

/// Parse changelog text into a document
pub fn parse_str(content: &str) -> ChangelogDocument {
    parse_lines(content.lines())
}

/// Parse changelog lines into a document
pub fn parse_lines<I, S>(lines: I) -> ChangelogDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = DocumentBuilder::new();
    for line in lines {
        builder.read_line(line.as_ref().trim());
    }
    builder.finish()
}

/// Where the state machine currently is within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first version heading; unmatched lines belong to the header
    Header,
    /// Inside a version section, no category heading seen yet
    InVersion,
    /// Inside a category subsection of a version
    InCategory,
}

/// Accumulates the document while lines are fed in, then finalizes into an
/// immutable [`ChangelogDocument`].
struct DocumentBuilder {
    state: State,
    header: Vec<String>,
    versions: Vec<Version>,
    links: Vec<VersionLink>,
    current: Option<VersionBuilder>,
}

/// In-progress version section
struct VersionBuilder {
    number: String,
    date: DateTime<Utc>,
    changes: AggregatedChanges,
    category: Option<String>,
    pending: Vec<Change>,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            state: State::Header,
            header: Vec::new(),
            versions: Vec::new(),
            links: Vec::new(),
            current: None,
        }
    }

    fn read_line(&mut self, line: &str) {
        if let Some((number, date)) = match_version_heading(line) {
            self.flush_version();
            self.current = Some(VersionBuilder {
                number,
                date,
                changes: AggregatedChanges::new(),
                category: None,
                pending: Vec::new(),
            });
            self.state = State::InVersion;
            return;
        }

        if let Some(caps) = CATEGORY_PATTERN.captures(line) {
            self.flush_category();
            if let Some(version) = self.current.as_mut() {
                version.category = Some(caps[1].to_string());
                self.state = State::InCategory;
            }
            return;
        }

        if let Some(caps) = LINK_PATTERN.captures(line) {
            self.links.push(VersionLink::new(&caps[1], &caps[2]));
            return;
        }

        match self.state {
            State::Header => self.header.push(line.to_string()),
            State::InVersion => {
                // A change line with no open category has nowhere to go
                // and is dropped, matching the original parser.
            }
            State::InCategory => {
                if let Some(caps) = CHANGE_PATTERN.captures(line) {
                    if let Some(version) = self.current.as_mut() {
                        version.pending.push(Change::new(&caps[1]));
                    }
                }
            }
        }
    }

    fn finish(mut self) -> ChangelogDocument {
        self.flush_version();
        debug!(
            header_lines = self.header.len(),
            version_count = self.versions.len(),
            link_count = self.links.len(),
            "changelog parsed"
        );
        ChangelogDocument::new(self.header, self.versions, self.links)
    }

    /// Flush accumulated change lines into the current version under the
    /// open category, if any
    fn flush_category(&mut self) {
        if let Some(version) = self.current.as_mut() {
            if let Some(category) = version.category.take() {
                version.changes.insert(category, std::mem::take(&mut version.pending));
            }
        }
    }

    /// Close the current category and version and append the version to
    /// the document
    fn flush_version(&mut self) {
        self.flush_category();
        if let Some(version) = self.current.take() {
            self.versions
                .push(Version::new(version.number, version.date, version.changes));
        }
    }
}

/// Match a version heading and parse its date as UTC midnight. A heading
/// with an invalid calendar date fails the match and falls through to the
/// permissive rules.
fn match_version_heading(line: &str) -> Option<(String, DateTime<Utc>)> {
    let caps = VERSION_PATTERN.captures(line)?;
    let date = NaiveDate::parse_from_str(&caps[2], DATE_FORMAT).ok()?;
    let date = date.and_time(NaiveTime::MIN).and_utc();
    Some((caps[1].to_string(), date))
}
