//! Error types surfaced to the orchestrator

use thiserror::Error;

/// Failures that stop a run. Each maps to its own process exit status.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("File Name: ({name}) Not Found")]
    ResourceNotFound { name: String },

    #[error("Invalid YAML in File: {name} ({reason})")]
    MalformedResource { name: String, reason: String },

    #[error("Could not read File: {name} ({reason})")]
    ResourceUnreadable { name: String, reason: String },

    #[error("Step {index} has neither a label nor a block")]
    MissingIdentifier { index: usize },

    #[error("Error getting diff using {origin}: {reason}")]
    DiffFailure { origin: String, reason: String },

    #[error("Error uploading pipeline: {0}")]
    SinkFailure(String),
}

impl PipelineError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::ResourceNotFound { .. } => 2,
            PipelineError::MalformedResource { .. } => 3,
            PipelineError::MissingIdentifier { .. } => 4,
            PipelineError::DiffFailure { .. } => 5,
            PipelineError::SinkFailure(_) => 6,
            PipelineError::ResourceUnreadable { .. } => 7,
        }
    }
}
