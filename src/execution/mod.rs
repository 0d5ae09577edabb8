//! Run orchestration

pub mod generator;

pub use generator::{Generator, RunOptions, RunOutcome};
