//! CLI output formatting

use crate::core::{ConditionSet, Diagnostics};
use crate::execution::RunOutcome;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static RUN: Emoji<'_, '_> = Emoji("▶️  ", "> ");

/// Format one resolved condition
pub fn format_condition(label: &str, skip: bool) -> String {
    if skip {
        format!("{}{} {}", SKIP, style(label).dim(), style("skip").yellow())
    } else {
        format!("{}{} {}", RUN, style(label).bold(), style("run").green())
    }
}

/// Format the whole condition set, one label per line
pub fn format_conditions(conditions: &ConditionSet) -> String {
    conditions
        .iter()
        .map(|(label, skip)| format!("  {}", format_condition(label, skip)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format how a run ended
pub fn format_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Uploaded { steps, skipped } => format!(
            "{}Pipeline generated: {} steps ({} skipped, {} running)",
            CHECK,
            style(steps).cyan(),
            style(skipped).yellow(),
            style(steps - skipped).green()
        ),
        RunOutcome::PassedThrough { steps } => format!(
            "{}Plugin disabled, uploaded {} steps unmodified",
            WARN,
            style(steps).cyan()
        ),
        RunOutcome::NothingToUpload { diff } => format!(
            "{}No pipeline generated for diff: ({})",
            INFO,
            style(diff.join(", ")).dim()
        ),
    }
}

/// One-line count of recorded diagnostics, empty when there are none.
/// The diagnostics themselves are already in the log.
pub fn format_diagnostics(diagnostics: &Diagnostics) -> String {
    match diagnostics.len() {
        0 => String::new(),
        1 => format!("{}{}", WARN, style("1 configuration warning (see log)").yellow()),
        n => {
            let summary = format!("{} configuration warnings (see log)", n);
            format!("{}{}", WARN, style(summary).yellow())
        }
    }
}
