//! Changelog serialization

use tracing::debug;

use crate::types::{capitalize, Version, VersionLink, DATE_FORMAT};

/// Serializes a changelog document back to markdown text.
///
/// With `link_style` enabled, version headings wrap the number in brackets
/// so the trailing reference links resolve against them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangelogWriter {
    link_style: bool,
}

impl ChangelogWriter {
    /// Create a writer emitting plain version headings
    pub fn new() -> Self {
        Self { link_style: false }
    }

    /// Set whether version headings are written in link style
    pub fn with_link_style(mut self, link_style: bool) -> Self {
        self.link_style = link_style;
        self
    }

    /// Render header lines, version sections and links to text
    pub fn render(
        &self,
        header: &[String],
        versions: &[Version],
        links: &[VersionLink],
    ) -> String {
        let mut output = String::new();

        for line in header {
            output.push_str(line);
            output.push('\n');
        }

        for version in versions {
            self.render_version(version, &mut output);
        }

        for link in links {
            output.push_str(&format!("[{}]: {}\n", link.version, link.url));
        }

        debug!(output_len = output.len(), "changelog rendered");
        output
    }

    fn render_version(&self, version: &Version, output: &mut String) {
        let date = version.date.format(DATE_FORMAT);
        if self.link_style {
            output.push_str(&format!("## [{}] - {}\n", version.number, date));
        } else {
            output.push_str(&format!("## {} - {}\n", version.number, date));
        }

        for (category, changes) in version.changes.iter() {
            output.push_str(&format!("### {}\n", capitalize(category)));
            for change in changes {
                output.push_str(&format!("- {}\n", change.text()));
            }
            output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::types::{AggregatedChanges, Change};
    use chrono::{TimeZone, Utc};

    fn version(number: &str) -> Version {
        let mut changes = AggregatedChanges::new();
        changes.insert("Added", vec![Change::new("dark mode")]);
        changes.insert(
            "Fixed",
            vec![Change::new("crash on start"), Change::new("flaky sync")],
        );
        Version::new(
            number,
            Utc.with_ymd_and_hms(2020, 12, 15, 0, 0, 0).unwrap(),
            changes,
        )
    }

    #[test]
    fn test_render_plain_headings() {
        let writer = ChangelogWriter::new();
        let output = writer.render(
            &["# Changelog".to_string(), String::new()],
            &[version("2.12.0")],
            &[],
        );

        assert_eq!(
            output,
            "# Changelog\n\n## 2.12.0 - 2020-12-15\n### Added\n- dark mode\n\n### Fixed\n- crash on start\n- flaky sync\n\n"
        );
    }

    #[test]
    fn test_render_link_style() {
        let writer = ChangelogWriter::new().with_link_style(true);
        let output = writer.render(
            &[],
            &[version("2.12.0")],
            &[VersionLink::new(
                "2.12.0",
                "https://example.com/download/2.12.0",
            )],
        );

        assert!(output.starts_with("## [2.12.0] - 2020-12-15\n"));
        assert!(output.ends_with("[2.12.0]: https://example.com/download/2.12.0\n"));
    }

    #[test]
    fn test_category_headings_are_capitalized_first_char_only() {
        let mut changes = AggregatedChanges::new();
        changes.insert("fixed bugs", vec![Change::new("a fix")]);
        let version = Version::new(
            "1.0.1",
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            changes,
        );

        let output = ChangelogWriter::new().render(&[], &[version], &[]);
        assert!(output.contains("### Fixed bugs\n"));
    }

    #[test]
    fn test_version_without_changes_renders_heading_only() {
        let version = Version::new(
            "1.0.0",
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            AggregatedChanges::new(),
        );

        let output = ChangelogWriter::new().render(&[], &[version], &[]);
        assert_eq!(output, "## 1.0.0 - 2021-01-01\n");
    }

    #[test]
    fn test_round_trip_reproduces_document() {
        let writer = ChangelogWriter::new();
        let header = vec![
            "# Changelog".to_string(),
            "All notable changes are documented here.".to_string(),
            String::new(),
        ];
        let versions = vec![version("2.12.0"), version("2.11.0")];
        let output = writer.render(&header, &versions, &[]);

        let reparsed = parse_str(&output);
        assert_eq!(reparsed.header, header);
        assert_eq!(reparsed.versions, versions);
        assert!(reparsed.links.is_empty());
    }

    #[test]
    fn test_round_trip_with_links() {
        let writer = ChangelogWriter::new().with_link_style(true);
        let links = vec![
            VersionLink::new("2.11.0", "https://example.com/2.11.0"),
            VersionLink::new("2.12.0", "https://example.com/2.12.0"),
        ];
        let versions = vec![version("2.12.0"), version("2.11.0")];
        let output = writer.render(&[], &versions, &links);

        let reparsed = parse_str(&output);
        assert_eq!(reparsed.versions, versions);
        assert_eq!(reparsed.links, links);
    }
}
