//! Shared test doubles for diff sources and pipeline sinks

#![allow(dead_code)]

use async_trait::async_trait;
use git_diff_conditional::{DiffSource, PipelineDocument, PipelineError, PipelineSink};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Diff source returning a fixed list of paths
pub struct MockDiff {
    paths: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl MockDiff {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl DiffSource for MockDiff {
    async fn changed_files(&self) -> Result<Vec<String>, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.paths.clone())
    }
}

/// Diff source that always fails
pub struct FailingDiff;

#[async_trait]
impl DiffSource for FailingDiff {
    async fn changed_files(&self) -> Result<Vec<String>, PipelineError> {
        Err(PipelineError::DiffFailure {
            origin: "mock".to_string(),
            reason: "no repository".to_string(),
        })
    }
}

/// Sink that keeps every published pipeline
#[derive(Clone, Default)]
pub struct RecordingSink {
    published: Arc<Mutex<Vec<PipelineDocument>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<PipelineDocument> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineSink for RecordingSink {
    async fn publish(&self, pipeline: &PipelineDocument) -> Result<(), PipelineError> {
        if self.fail {
            return Err(PipelineError::SinkFailure("rejected by mock".to_string()));
        }
        self.published.lock().unwrap().push(pipeline.clone());
        Ok(())
    }
}

/// Write `yaml` to a temporary pipeline file
pub fn pipeline_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}
