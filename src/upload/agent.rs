//! Upload through `buildkite-agent pipeline upload`

use crate::core::PipelineDocument;
use crate::error::PipelineError;
use crate::upload::{render, PipelineSink};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Pipes the pipeline YAML into the agent's `pipeline upload` command
#[derive(Debug, Clone)]
pub struct AgentUploadSink {
    /// Path to the agent executable
    agent_path: String,

    /// Timeout for the upload in seconds
    timeout_secs: u64,
}

impl AgentUploadSink {
    /// Create a new upload sink
    ///
    /// # Arguments
    /// * `agent_path` - Path to the agent executable (e.g., "buildkite-agent")
    /// * `timeout_secs` - Timeout for the upload in seconds
    pub fn new(agent_path: String, timeout_secs: u64) -> Self {
        Self {
            agent_path,
            timeout_secs,
        }
    }

    pub fn agent_path(&self) -> &str {
        &self.agent_path
    }
}

#[async_trait]
impl PipelineSink for AgentUploadSink {
    /// Spawns `<agent> pipeline upload` and writes the YAML to its stdin.
    ///
    /// # Errors
    /// Returns `SinkFailure` if the agent cannot be spawned, exits with a
    /// non-zero status, or does not finish within the timeout.
    async fn publish(&self, pipeline: &PipelineDocument) -> Result<(), PipelineError> {
        let yaml = render(pipeline)?;
        debug!("Uploading pipeline ({} bytes) via {}", yaml.len(), self.agent_path);

        let mut child = Command::new(&self.agent_path)
            .args(["pipeline", "upload"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PipelineError::SinkFailure(format!("failed to execute {}: {}", self.agent_path, e))
            })?;

        let stdin = child.stdin.take();
        let upload = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(yaml.as_bytes()).await.map_err(|e| {
                    PipelineError::SinkFailure(format!("failed to write pipeline to agent: {}", e))
                })?;
            }
            // stdin is closed here so the agent sees EOF
            child
                .wait_with_output()
                .await
                .map_err(|e| PipelineError::SinkFailure(format!("failed to wait for agent: {}", e)))
        };

        let output = timeout(Duration::from_secs(self.timeout_secs), upload)
            .await
            .map_err(|_| {
                PipelineError::SinkFailure(format!("timed out after {} seconds", self.timeout_secs))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", self.agent_path, exit_code, stderr.trim());
            return Err(PipelineError::SinkFailure(format!(
                "{} exited with code {}: {}",
                self.agent_path,
                exit_code,
                stderr.trim()
            )));
        }

        info!("Pipeline uploaded");
        Ok(())
    }
}
