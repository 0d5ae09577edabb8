//! CLI command definitions

use crate::diff::{CommandDiffSource, DiffSource, FileDiffSource};
use crate::upload::{AgentUploadSink, FileSink, PipelineSink};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

/// Where the diff comes from
#[derive(Debug, Args, Clone)]
pub struct DiffArgs {
    /// Shell command printing one changed path per line
    #[arg(long, env = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL_DIFF")]
    pub diff: Option<String>,

    /// Read the diff from a file instead of running a command
    #[arg(long, conflicts_with = "diff")]
    pub diff_file: Option<PathBuf>,

    /// Timeout for diff and upload subprocesses in seconds
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
}

impl DiffArgs {
    pub fn source(&self) -> Arc<dyn DiffSource> {
        match &self.diff_file {
            Some(path) => Arc::new(FileDiffSource::new(path.clone())),
            None => Arc::new(CommandDiffSource::from_setting(
                self.diff.clone(),
                self.timeout_secs,
            )),
        }
    }
}

/// Annotate the dynamic pipeline and upload it
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Path to the pipeline YAML file to annotate
    #[arg(short = 'f', long, env = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL_DYNAMIC_PIPELINE")]
    pub dynamic_pipeline: PathBuf,

    #[command(flatten)]
    pub diff: DiffArgs,

    /// Upload the pipeline unmodified; any non-empty value disables
    #[arg(
        long,
        env = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL_DISABLE_PLUGIN",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub disable_plugin: Option<String>,

    /// Write the pipeline to this file instead of uploading it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the buildkite-agent executable
    #[arg(long, env = "BUILDKITE_AGENT_PATH", default_value = "buildkite-agent")]
    pub agent: String,
}

impl GenerateCommand {
    /// True when the disable setting is present and non-empty, whatever its value
    pub fn disabled(&self) -> bool {
        self.disable_plugin.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn sink(&self) -> Arc<dyn PipelineSink> {
        match &self.output {
            Some(path) => Arc::new(FileSink::new(path.clone())),
            None => Arc::new(AgentUploadSink::new(
                self.agent.clone(),
                self.diff.timeout_secs,
            )),
        }
    }
}

/// Print resolved conditions
#[derive(Debug, Args, Clone)]
pub struct ConditionsCommand {
    #[command(flatten)]
    pub diff: DiffArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a pipeline file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the pipeline YAML file
    #[arg(short = 'f', long, env = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL_DYNAMIC_PIPELINE")]
    pub dynamic_pipeline: PathBuf,
}

/// Parse a log level, accepting Python-style `WARNING`
pub fn parse_log_level(s: &str) -> Result<Level, String> {
    match s.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" | "CRITICAL" => Ok(Level::ERROR),
        _ => Err(format!("Invalid log level: {}", s)),
    }
}
