//! Changelog document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for version headings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single change description within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Change(String);

impl Change {
    /// Create a new change from its description text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The description text
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Insertion-ordered mapping from category name to changes.
///
/// Category order is significant and survives serialization, so the map is
/// backed by a vector of pairs rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedChanges(Vec<(String, Vec<Change>)>);

impl AggregatedChanges {
    /// Create an empty change map
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the map holds no categories
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether a category with this exact name is present
    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|(name, _)| name == category)
    }

    /// Changes recorded under a category, if present
    pub fn get(&self, category: &str) -> Option<&[Change]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, changes)| changes.as_slice())
    }

    /// Set the changes for a category.
    ///
    /// Replaces the value of an existing category in place, keeping its
    /// position; otherwise appends the category at the end.
    pub fn insert(&mut self, category: impl Into<String>, changes: Vec<Change>) {
        let category = category.into();
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = changes,
            None => self.0.push((category, changes)),
        }
    }

    /// Append a single change to a category, creating it if needed
    pub fn add(&mut self, category: impl Into<String>, change: Change) {
        let category = category.into();
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some((_, changes)) => changes.push(change),
            None => self.0.push((category, vec![change])),
        }
    }

    /// Iterate over `(category, changes)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Change])> {
        self.0
            .iter()
            .map(|(name, changes)| (name.as_str(), changes.as_slice()))
    }

    /// Iterate over category names in insertion order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

/// One released or about-to-be-released changelog section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Version number, e.g. "2.12.0" or "2.11.1-rc1"
    pub number: String,
    /// Release date (UTC, day precision)
    pub date: DateTime<Utc>,
    /// Changes grouped by category, possibly empty
    pub changes: AggregatedChanges,
}

impl Version {
    /// Create a new version section
    pub fn new(number: impl Into<String>, date: DateTime<Utc>, changes: AggregatedChanges) -> Self {
        Self {
            number: number.into(),
            date,
            changes,
        }
    }
}

/// A trailing reference-style link mapping a version to a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLink {
    /// Version number the link refers to
    pub version: String,
    /// Link target
    pub url: String,
}

impl VersionLink {
    /// Create a new version link
    pub fn new(version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            url: url.into(),
        }
    }
}

/// The whole changelog file: preamble, version sections and link references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogDocument {
    /// Everything before the first version heading, verbatim
    pub header: Vec<String>,
    /// Version sections, most recent first
    pub versions: Vec<Version>,
    /// Reference links, in source order
    pub links: Vec<VersionLink>,
}

impl ChangelogDocument {
    /// Create a document from its parts
    pub fn new(header: Vec<String>, versions: Vec<Version>, links: Vec<VersionLink>) -> Self {
        Self {
            header,
            versions,
            links,
        }
    }

    /// The most recent version section, if any
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.first()
    }
}

/// Uppercase the first character, leaving the rest untouched
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
