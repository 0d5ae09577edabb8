//! Resolved skip decisions for one run

use crate::core::{
    diagnostics::{Diagnostic, Diagnostics},
    rules::RuleConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Step label → skip decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConditionSet {
    conditions: BTreeMap<String, bool>,
}

impl ConditionSet {
    /// Resolve every labelled rule group against the diff.
    ///
    /// Groups are visited in ascending step index. When two groups share a
    /// label the later one wins and a [`Diagnostic::DuplicateLabel`] is
    /// recorded.
    pub fn build(rules: &RuleConfig, diff: &[String], diagnostics: &mut Diagnostics) -> Self {
        let mut conditions = BTreeMap::new();

        for (step_index, rule) in rules.groups() {
            let Some(label) = rule.label.as_deref().filter(|label| !label.is_empty()) else {
                if !rule.include.is_empty() || !rule.exclude.is_empty() {
                    diagnostics.record(Diagnostic::UnlabelledRuleGroup { step_index });
                }
                continue;
            };

            let skip = rule.resolve(label, diff, diagnostics);
            debug!("Step {} ({}) resolved to skip={}", step_index, label, skip);

            if conditions.insert(label.to_string(), skip).is_some() {
                diagnostics.record(Diagnostic::DuplicateLabel {
                    label: label.to_string(),
                    step_index,
                });
            }
        }

        Self { conditions }
    }

    /// Resolved decision for a label, if one was configured
    pub fn get(&self, label: &str) -> Option<bool> {
        self.conditions.get(label).copied()
    }

    /// Decision for a label, defaulting to running the step
    pub fn skip_for(&self, label: &str) -> bool {
        self.get(label).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.conditions.iter().map(|(label, skip)| (label.as_str(), *skip))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(label, skip)| (label.into(), skip))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::StepRule;

    fn diff(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn build(rules: RuleConfig, changed: &[&str]) -> (ConditionSet, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let conditions = ConditionSet::build(&rules, &diff(changed), &mut diagnostics);
        (conditions, diagnostics)
    }

    #[test]
    fn test_include_match_runs_step() {
        let rules = RuleConfig::new()
            .with_rule(0, StepRule::new("test_1").with_include("terraform/*.tf"));
        let (conditions, _) = build(rules, &["terraform/main.tf"]);
        assert_eq!(conditions, ConditionSet::from_iter([("test_1", false)]));
    }

    #[test]
    fn test_exclude_match_skips_step() {
        let rules =
            RuleConfig::new().with_rule(0, StepRule::new("test_2").with_exclude("folder/**"));
        let (conditions, _) = build(rules, &["folder/file"]);
        assert_eq!(conditions, ConditionSet::from_iter([("test_2", true)]));
    }

    #[test]
    fn test_two_labels() {
        let rules = RuleConfig::new()
            .with_rule(0, StepRule::new("test_3").with_include("**/file_0"))
            .with_rule(1, StepRule::new("test_3_other").with_exclude("**/*_1"));
        let (conditions, _) = build(rules, &["folder_a/file_0", "folder_b/.folder/file_2"]);

        assert_eq!(
            conditions,
            ConditionSet::from_iter([("test_3", false), ("test_3_other", false)])
        );
    }

    #[test]
    fn test_no_rules() {
        let (conditions, diagnostics) = build(RuleConfig::new(), &["file.py"]);
        assert!(conditions.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_empty_diff_skips_include_only_step() {
        let rules = RuleConfig::new().with_rule(0, StepRule::new("test_4").with_include("file.py"));
        let (conditions, _) = build(rules, &[]);
        assert_eq!(conditions.get("test_4"), Some(true));
    }

    #[test]
    fn test_wildcard_include_runs_on_any_change() {
        let rules = RuleConfig::new().with_rule(0, StepRule::new("test_5").with_include("*"));
        let (conditions, _) = build(rules, &["file.py", "folder/file.tf"]);
        assert_eq!(conditions.get("test_5"), Some(false));
    }

    #[test]
    fn test_label_without_patterns_defaults_to_run() {
        let rules = RuleConfig::new().with_rule(0, StepRule::new("bare"));
        let (conditions, diagnostics) = build(rules, &["file.py"]);

        assert_eq!(conditions.get("bare"), Some(false));
        assert_eq!(
            diagnostics.records(),
            &[Diagnostic::NoSkipSettings {
                label: "bare".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_label_later_index_wins() {
        let rules = RuleConfig::new()
            .with_rule(0, StepRule::new("dup").with_exclude("*.md"))
            .with_rule(3, StepRule::new("dup").with_include("*.md"));
        let (conditions, diagnostics) = build(rules, &["readme.md"]);

        assert_eq!(conditions.get("dup"), Some(false));
        assert_eq!(
            diagnostics.records(),
            &[Diagnostic::DuplicateLabel {
                label: "dup".to_string(),
                step_index: 3
            }]
        );
    }

    #[test]
    fn test_unlabelled_group_is_ignored() {
        let rule = StepRule {
            label: None,
            include: vec!["*.rs".to_string()],
            exclude: vec![],
        };
        let (conditions, diagnostics) = build(RuleConfig::new().with_rule(5, rule), &["a.rs"]);

        assert!(conditions.is_empty());
        assert_eq!(
            diagnostics.records(),
            &[Diagnostic::UnlabelledRuleGroup { step_index: 5 }]
        );
    }

    #[test]
    fn test_unknown_label_defaults_to_run() {
        let conditions = ConditionSet::from_iter([("known", true)]);
        assert!(conditions.skip_for("known"));
        assert!(!conditions.skip_for("unknown"));
        assert_eq!(conditions.get("unknown"), None);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let conditions = ConditionSet::from_iter([("a", true), ("b", false)]);
        let json = serde_json::to_string(&conditions).unwrap();
        assert_eq!(json, r#"{"a":true,"b":false}"#);
    }
}
