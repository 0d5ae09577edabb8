//! Pipeline document loaded from YAML
//!
//! Steps are kept as raw YAML values so that every field an author wrote
//! survives the round trip; only `skip` is ever added.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

/// A Buildkite pipeline: a `steps` list plus any other top-level keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    /// Pipeline steps, in order
    pub steps: Vec<Value>,

    /// Top-level keys other than `steps` (`env`, `agents`, ...)
    #[serde(flatten)]
    pub extra: Mapping,
}

impl PipelineDocument {
    pub fn new(steps: Vec<Value>) -> Self {
        Self {
            steps,
            extra: Mapping::new(),
        }
    }

    /// Load a pipeline from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let name = path.display().to_string();

        info!("Loading pipeline from {}", name);

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("{}", e);
            match e.kind() {
                ErrorKind::NotFound => PipelineError::ResourceNotFound { name: name.clone() },
                ErrorKind::InvalidData => PipelineError::MalformedResource {
                    name: name.clone(),
                    reason: e.to_string(),
                },
                _ => PipelineError::ResourceUnreadable {
                    name: name.clone(),
                    reason: e.to_string(),
                },
            }
        })?;

        Self::from_yaml(&name, &content)
    }

    /// Parse a pipeline from YAML text. `name` identifies the source in errors.
    pub fn from_yaml(name: &str, yaml: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(yaml).map_err(|e| {
            error!("Invalid YAML in File: {}", name);
            PipelineError::MalformedResource {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Render as block-style YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps whose `skip` would stop them running
    pub fn skipped_count(&self) -> usize {
        self.steps
            .iter()
            .filter_map(|step| step.get("skip"))
            .filter(|skip| match skip {
                Value::Bool(skip) => *skip,
                Value::String(reason) => !reason.is_empty(),
                _ => false,
            })
            .count()
    }
}
