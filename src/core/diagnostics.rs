//! Non-fatal configuration diagnostics
//!
//! Core calls record what they had to default here instead of only logging,
//! so callers (and tests) can inspect exactly which gaps were hit.

use std::fmt;
use tracing::warn;

/// A configuration gap or override that was recovered with a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Rule group has neither include nor exclude patterns
    NoSkipSettings { label: String },
    /// Step already carries an explicit `skip`, which is kept
    SkipAlreadySet { label: String },
    /// Step label has no resolved condition, so it runs
    NoCondition { label: String },
    /// A later rule group reused a label and replaced its condition
    DuplicateLabel { label: String, step_index: usize },
    /// Rule group has patterns but no label to attach them to
    UnlabelledRuleGroup { step_index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoSkipSettings { label } => {
                write!(f, "label ({}) passed in but no skip settings configured", label)
            }
            Diagnostic::SkipAlreadySet { label } => {
                write!(f, "label ({}) already has a skip key", label)
            }
            Diagnostic::NoCondition { label } => {
                write!(f, "No Conditions set for label ({})", label)
            }
            Diagnostic::DuplicateLabel { label, step_index } => write!(
                f,
                "label ({}) configured more than once, step {} overrides earlier settings",
                label, step_index
            ),
            Diagnostic::UnlabelledRuleGroup { step_index } => {
                write!(f, "step {} has patterns but no label, ignoring", step_index)
            }
        }
    }
}

/// Collects diagnostics for a single run
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a warning
    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(Diagnostic::NoCondition {
            label: "a".to_string(),
        });
        diagnostics.record(Diagnostic::SkipAlreadySet {
            label: "b".to_string(),
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.records()[0],
            Diagnostic::NoCondition {
                label: "a".to_string()
            }
        );
    }

    #[test]
    fn test_messages() {
        let d = Diagnostic::NoSkipSettings {
            label: "test".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "label (test) passed in but no skip settings configured"
        );

        let d = Diagnostic::SkipAlreadySet {
            label: "already contains skip".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "label (already contains skip) already has a skip key"
        );
    }
}
