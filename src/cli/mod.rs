//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ConditionsCommand, GenerateCommand, ValidateCommand};
use std::ffi::OsString;
use tracing::Level;

/// Skip Buildkite steps based on the files changed in a git diff
#[derive(Debug, Parser, Clone)]
#[command(name = "git-diff-conditional")]
#[command(version)]
#[command(
    about = "Skip Buildkite pipeline steps based on the files changed in a git diff",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN/WARNING, ERROR)
    #[arg(
        long,
        global = true,
        env = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL_LOG_LEVEL",
        default_value = "INFO",
        value_parser = commands::parse_log_level
    )]
    pub log_level: Level,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Annotate the dynamic pipeline and upload it
    Generate(GenerateCommand),

    /// Print the skip decision resolved for each configured label
    Conditions(ConditionsCommand),

    /// Check that a pipeline file loads and every step can be identified
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Effective log level
    pub fn level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            self.log_level
        }
    }
}
