//! Sources of changed file paths

pub mod command;
pub mod file;

use crate::error::PipelineError;
use async_trait::async_trait;

pub use command::CommandDiffSource;
pub use file::FileDiffSource;

/// Commands tried in order when no diff command is configured
pub const DEFAULT_DIFF_COMMANDS: [&str; 2] = [
    "git diff --name-only origin/master...HEAD",
    "git diff --name-only HEAD HEAD~1",
];

/// Trait for diff sources - allows for different implementations
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Paths changed between the two revisions being compared
    async fn changed_files(&self) -> Result<Vec<String>, PipelineError>;
}

/// Split `git diff --name-only` style output into paths.
///
/// Surrounding whitespace is stripped and blank lines are dropped.
pub fn parse_diff(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
