//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use keepachange_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_YAML};

use crate::cli::Cli;

/// Initialize a new keepachange configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_YAML));

        let config_path = if self.toml && config_path.extension().is_some_and(|e| e == "yaml") {
            config_path.with_extension("toml")
        } else {
            config_path
        };

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = if self.toml {
            let config: keepachange_core::config::Config =
                serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
            toml::to_string_pretty(&config)?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        std::fs::write(&config_path, content)?;

        if !cli.quiet {
            println!(
                "{} Configuration written to {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
        }

        Ok(())
    }
}
