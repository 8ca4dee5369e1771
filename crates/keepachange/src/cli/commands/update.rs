//! Update command

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use console::style;
use tracing::info;

use keepachange_changelog::{ChangelogUpdater, UpdateOutcome};
use keepachange_core::config::load_config_or_default;

use crate::cli::{Cli, OutputFormat};

/// Merge unreleased fragments into the changelog
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Changelog file (defaults to the configured path)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Fragment file or directory (defaults to the configured path)
    #[arg(long)]
    pub fragments: Option<PathBuf>,

    /// Version for the new section (computed from the entries when omitted)
    #[arg(long = "release-version", value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Release date as YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    pub date: Option<String>,

    /// URL pattern for version links, with a `{}` or `{version}` placeholder
    #[arg(long, value_name = "PATTERN")]
    pub version_url_pattern: Option<String>,

    /// Print the merged changelog without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

impl UpdateCommand {
    /// Execute the update command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            file = ?self.file,
            release_version = ?self.release_version,
            dry_run = self.dry_run,
            "executing update command"
        );
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd);

        let file = self
            .file
            .clone()
            .unwrap_or_else(|| config.changelog.file.clone());
        let fragments = self
            .fragments
            .clone()
            .unwrap_or_else(|| config.changelog.fragments.clone());

        let mut updater = ChangelogUpdater::new(&file, fragments);
        if let Some(version) = &self.release_version {
            updater = updater.with_version(version.as_str());
        }
        if let Some(date) = &self.date {
            updater = updater.with_date(parse_date(date)?);
        }
        let pattern = self
            .version_url_pattern
            .as_deref()
            .or_else(|| config.changelog.url_pattern());
        if let Some(pattern) = pattern {
            updater = updater.with_version_urls(pattern);
        }

        if self.dry_run {
            return match updater.preview()? {
                Some(output) => {
                    print!("{}", output);
                    Ok(())
                }
                None => {
                    self.report_no_changes(cli);
                    Ok(())
                }
            };
        }

        match updater.update()? {
            UpdateOutcome::NoChanges => self.report_no_changes(cli),
            UpdateOutcome::Updated { version } => match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "outcome": "updated", "version": version })
                ),
                OutputFormat::Text => {
                    if !cli.quiet {
                        println!(
                            "{} Merged unreleased changes into {} as version {}",
                            style("✓").green().bold(),
                            style(file.display()).cyan(),
                            style(&version).cyan()
                        );
                    }
                }
            },
        }

        Ok(())
    }

    fn report_no_changes(&self, cli: &Cli) {
        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "outcome": "no-changes" }));
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{}",
                        style("No unreleased changes found. Changelog left untouched.").yellow()
                    );
                }
            }
        }
    }
}

/// Parse a YYYY-MM-DD date as UTC midnight
fn parse_date(input: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", input, e))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2020-12-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2020-12-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("15.12.2020").is_err());
    }
}
