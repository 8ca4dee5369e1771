//! CLI definition and command handling

pub mod commands;

use clap::{Parser, Subcommand};

use commands::{InitCommand, NextVersionCommand, UpdateCommand};

/// keepachange - merge unreleased change fragments into a changelog
#[derive(Debug, Parser)]
#[command(name = "keepachange")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new keepachange configuration
    Init(InitCommand),

    /// Merge unreleased fragments into the changelog
    Update(UpdateCommand),

    /// Print the version the next update would release
    NextVersion(NextVersionCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Update(ref cmd) => cmd.execute(&self),
            Commands::NextVersion(ref cmd) => cmd.execute(&self),
        }
    }
}
