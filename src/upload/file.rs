//! Save the pipeline to disk for a later upload step

use crate::core::PipelineDocument;
use crate::error::PipelineError;
use crate::upload::{render, PipelineSink};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{error, info};

/// Default location a post-command hook uploads from
pub const DEFAULT_OUTPUT_FILE: &str = ".git_diff_conditional/pipeline_output";

/// Writes the pipeline YAML to a file, creating parent directories
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PipelineSink for FileSink {
    async fn publish(&self, pipeline: &PipelineDocument) -> Result<(), PipelineError> {
        let yaml = render(pipeline)?;

        let write = async {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&self.path, yaml).await
        };

        write.await.map_err(|e| {
            error!("{}", e);
            PipelineError::SinkFailure(format!("error saving pipeline to disk: {}", e))
        })?;

        info!("Pipeline saved to {}", self.path.display());
        Ok(())
    }
}
