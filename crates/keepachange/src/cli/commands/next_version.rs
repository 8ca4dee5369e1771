//! Next-version command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use keepachange_changelog::ChangelogUpdater;
use keepachange_core::config::load_config_or_default;

use crate::cli::{Cli, OutputFormat};

/// Print the version the next update would release
#[derive(Debug, Args)]
pub struct NextVersionCommand {
    /// Changelog file (defaults to the configured path)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Fragment file or directory (defaults to the configured path)
    #[arg(long)]
    pub fragments: Option<PathBuf>,
}

impl NextVersionCommand {
    /// Execute the next-version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(file = ?self.file, fragments = ?self.fragments, "executing next-version command");
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

        let next = ChangelogUpdater::new(file, fragments).next_version()?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "next_version": next }));
            }
            OutputFormat::Text => match next {
                Some(version) => println!("{}", version),
                None => {
                    if !cli.quiet {
                        println!("{}", style("No unreleased changes found.").yellow());
                    }
                }
            },
        }

        Ok(())
    }
}
