//! Diff read from a file written earlier in the job

use crate::diff::{parse_diff, DiffSource};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Default location a pre-command hook writes the diff to
pub const DEFAULT_DIFF_FILE: &str = ".git_diff_conditional/git_diff";

/// Reads one changed path per line from a file
#[derive(Debug, Clone)]
pub struct FileDiffSource {
    path: PathBuf,
}

impl FileDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DiffSource for FileDiffSource {
    async fn changed_files(&self) -> Result<Vec<String>, PipelineError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            debug!("{}", e);
            PipelineError::DiffFailure {
                origin: format!("file: {}", self.path.display()),
                reason: e.to_string(),
            }
        })?;

        let diff = parse_diff(&content);
        info!("Got diff from file ({}): {} paths", self.path.display(), diff.len());
        Ok(diff)
    }
}
