//! git-diff-conditional - skip Buildkite pipeline steps based on a git diff

pub mod cli;
pub mod core;
pub mod diff;
pub mod error;
pub mod execution;
pub mod upload;

/// Prefix of every environment variable the plugin reads
pub const PLUGIN_PREFIX: &str = "BUILDKITE_PLUGIN_GIT_DIFF_CONDITIONAL";

// Re-export commonly used types
pub use crate::core::{
    annotate, ConditionSet, Diagnostic, Diagnostics, PipelineDocument, RuleConfig, StepRule,
};
pub use diff::{CommandDiffSource, DiffSource, FileDiffSource};
pub use error::PipelineError;
pub use execution::{Generator, RunOptions, RunOutcome};
pub use upload::{AgentUploadSink, FileSink, PipelineSink};
