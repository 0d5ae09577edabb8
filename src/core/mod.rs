//! Core skip-decision logic
//!
//! Everything in here is synchronous and free of I/O: rule configuration
//! is resolved against a diff into a condition set, which is then merged
//! into the steps of a loaded pipeline document.

pub mod annotate;
pub mod conditions;
pub mod diagnostics;
pub mod glob;
pub mod pipeline;
pub mod rules;

pub use annotate::*;
pub use conditions::*;
pub use diagnostics::*;
pub use pipeline::*;
pub use rules::*;
