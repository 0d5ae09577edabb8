//! Destinations for the generated pipeline

pub mod agent;
pub mod file;

use crate::core::PipelineDocument;
use crate::error::PipelineError;
use async_trait::async_trait;

pub use agent::AgentUploadSink;
pub use file::FileSink;

/// Trait for pipeline sinks - allows for different implementations
#[async_trait]
pub trait PipelineSink: Send + Sync {
    /// Hand the final pipeline over for upload
    async fn publish(&self, pipeline: &PipelineDocument) -> Result<(), PipelineError>;
}

pub(crate) fn render(pipeline: &PipelineDocument) -> Result<String, PipelineError> {
    pipeline
        .to_yaml()
        .map_err(|e| PipelineError::SinkFailure(format!("failed to render pipeline: {}", e)))
}
