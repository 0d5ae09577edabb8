//! Sequences diff, pipeline loading, annotation and upload for one run

use crate::{
    core::{annotate, ConditionSet, Diagnostics, PipelineDocument, RuleConfig},
    diff::DiffSource,
    error::PipelineError,
    upload::PipelineSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Inputs for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Pipeline file whose steps get annotated
    pub pipeline_path: PathBuf,

    /// Forward the pipeline unmodified
    pub disabled: bool,

    /// Per-step include/exclude rules
    pub rules: RuleConfig,
}

/// How a run finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Annotated pipeline handed to the sink
    Uploaded { steps: usize, skipped: usize },

    /// Disable flag set, original pipeline handed to the sink
    PassedThrough { steps: usize },

    /// Annotated pipeline had no steps, the sink was not called
    NothingToUpload { diff: Vec<String> },
}

/// Generates the conditional pipeline and hands it to a sink
pub struct Generator {
    diff_source: Arc<dyn DiffSource>,
    sink: Arc<dyn PipelineSink>,
}

impl Generator {
    pub fn new(diff_source: Arc<dyn DiffSource>, sink: Arc<dyn PipelineSink>) -> Self {
        Self { diff_source, sink }
    }

    /// Execute one run.
    ///
    /// Non-fatal gaps end up in `diagnostics`. Resource failures stop the
    /// run before anything reaches the sink.
    pub async fn run(
        &self,
        options: &RunOptions,
        diagnostics: &mut Diagnostics,
    ) -> Result<RunOutcome, PipelineError> {
        let dynamic_pipeline = PipelineDocument::from_file(&options.pipeline_path)?;

        if options.disabled {
            warn!("Plugin disable flag detected, passing entire pipeline to buildkite");
            let steps = dynamic_pipeline.steps.len();
            self.sink.publish(&dynamic_pipeline).await?;
            return Ok(RunOutcome::PassedThrough { steps });
        }

        let diff = self.diff_source.changed_files().await?;
        let conditions = ConditionSet::build(&options.rules, &diff, diagnostics);
        let pipeline = annotate(dynamic_pipeline, &conditions, diagnostics)?;

        if pipeline.is_empty() {
            info!("No pipeline generated for diff: ({:?})", diff);
            return Ok(RunOutcome::NothingToUpload { diff });
        }

        info!("Dynamic pipeline generated, saving for agent upload");
        self.sink.publish(&pipeline).await?;

        Ok(RunOutcome::Uploaded {
            steps: pipeline.steps.len(),
            skipped: pipeline.skipped_count(),
        })
    }
}

