//! Diff obtained by running shell commands

use crate::diff::{parse_diff, DiffSource, DEFAULT_DIFF_COMMANDS};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs diff commands through `sh -c`.
///
/// With several commands the first one producing a non-empty diff wins. A
/// failing command falls through to the next one; only the last failure is
/// reported.
#[derive(Debug, Clone)]
pub struct CommandDiffSource {
    commands: Vec<String>,

    /// Timeout for each command in seconds
    timeout_secs: u64,
}

impl CommandDiffSource {
    pub fn new(commands: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            commands,
            timeout_secs,
        }
    }

    /// Use a single configured command, or the defaults when there is none
    pub fn from_setting(command: Option<String>, timeout_secs: u64) -> Self {
        let commands = match command {
            Some(command) => vec![command],
            None => DEFAULT_DIFF_COMMANDS.iter().map(|c| c.to_string()).collect(),
        };
        Self::new(commands, timeout_secs)
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    async fn run_command(&self, command: &str) -> Result<Vec<String>, PipelineError> {
        debug!("Running diff command: {}", command);

        let failure = |reason: String| PipelineError::DiffFailure {
            origin: format!("command: {}", command),
            reason,
        };

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new("sh")
                .arg("-c")
                .arg(command)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| failure(format!("timed out after {} seconds", self.timeout_secs)))?;

        let output = result.map_err(|e| failure(format!("failed to spawn shell: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(failure(format!(
                "exited with code {}: {}",
                exit_code,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_diff(&stdout))
    }
}

#[async_trait]
impl DiffSource for CommandDiffSource {
    async fn changed_files(&self) -> Result<Vec<String>, PipelineError> {
        let mut last_error = None;
        let mut any_succeeded = false;

        for command in &self.commands {
            match self.run_command(command).await {
                Ok(diff) if !diff.is_empty() => {
                    info!("Got diff using command ({})", command);
                    return Ok(diff);
                }
                Ok(_) => {
                    debug!("Command ({}) produced an empty diff", command);
                    any_succeeded = true;
                }
                Err(e) => {
                    warn!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(e),
            _ => {
                info!("No changed files found");
                Ok(Vec::new())
            }
        }
    }
}
