//! Per-step include/exclude rules
//!
//! Buildkite flattens plugin configuration into environment variables such
//! as `<PREFIX>_STEPS_0_LABEL` and `<PREFIX>_STEPS_0_INCLUDE_1`. Those keys
//! are parsed once here into a [`RuleConfig`]; the rest of the crate only
//! sees structured rule groups.

use crate::core::{
    diagnostics::{Diagnostic, Diagnostics},
    glob::any_match,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static RULE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^STEPS_([0-9]+)_(LABEL|INCLUDE|EXCLUDE)(?:_([0-9]+))?$")
        .expect("rule key pattern is a valid regex")
});

/// Include/exclude patterns configured for one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRule {
    /// Label of the step the rule applies to
    pub label: Option<String>,

    /// Patterns that make the step run when matched
    pub include: Vec<String>,

    /// Patterns that make the step skip when matched
    pub exclude: Vec<String>,
}

impl StepRule {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Resolve this rule against a diff
    pub fn resolve(&self, label: &str, diff: &[String], diagnostics: &mut Diagnostics) -> bool {
        resolve(label, &self.include, &self.exclude, diff, diagnostics)
    }
}

/// Decide whether a step should be skipped.
///
/// Exclude patterns win over include patterns: when both are configured only
/// the exclude list is consulted. An include-only rule skips the step unless
/// some changed path matches.
pub fn resolve(
    label: &str,
    include: &[String],
    exclude: &[String],
    diff: &[String],
    diagnostics: &mut Diagnostics,
) -> bool {
    if include.is_empty() && exclude.is_empty() {
        diagnostics.record(Diagnostic::NoSkipSettings {
            label: label.to_string(),
        });
        false
    } else if !exclude.is_empty() {
        any_match(exclude, diff)
    } else {
        !any_match(include, diff)
    }
}

/// All rule groups, keyed by step index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    groups: BTreeMap<usize, StepRule>,
}

#[derive(Default)]
struct RawGroup {
    label: Option<String>,
    include: Vec<(Option<usize>, String)>,
    exclude: Vec<(Option<usize>, String)>,
}

impl RuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule group at `index`
    pub fn with_rule(mut self, index: usize, rule: StepRule) -> Self {
        self.groups.insert(index, rule);
        self
    }

    /// Parse rule groups from the process environment
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Parse rule groups from flat `key=value` pairs.
    ///
    /// Keys not under `<prefix>_STEPS_` are ignored. Array-style keys
    /// (`..._INCLUDE_0`, `..._INCLUDE_1`) are ordered by their suffix, after
    /// a plain `..._INCLUDE` value if one is present.
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let key_prefix = format!("{}_", prefix);
        let mut raw: BTreeMap<usize, RawGroup> = BTreeMap::new();

        for (key, value) in vars {
            let Some(rest) = key.as_ref().strip_prefix(&key_prefix) else {
                continue;
            };
            let Some(caps) = RULE_KEY.captures(rest) else {
                continue;
            };
            let Ok(index) = caps[1].parse::<usize>() else {
                continue;
            };
            let position = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());

            debug!("Checking {}", key.as_ref());

            let group = raw.entry(index).or_default();
            match &caps[2] {
                "LABEL" if position.is_none() => group.label = Some(value.into()),
                "INCLUDE" => group.include.push((position, value.into())),
                "EXCLUDE" => group.exclude.push((position, value.into())),
                _ => {}
            }
        }

        let groups = raw
            .into_iter()
            .map(|(index, group)| {
                let rule = StepRule {
                    label: group.label,
                    include: ordered(group.include),
                    exclude: ordered(group.exclude),
                };
                debug!(
                    "Step {} patterns: include={:?} exclude={:?}",
                    index, rule.include, rule.exclude
                );
                (index, rule)
            })
            .collect();

        Self { groups }
    }

    /// Rule groups in ascending step index
    pub fn groups(&self) -> impl Iterator<Item = (usize, &StepRule)> {
        self.groups.iter().map(|(index, rule)| (*index, rule))
    }

    pub fn get(&self, index: usize) -> Option<&StepRule> {
        self.groups.get(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

fn ordered(mut patterns: Vec<(Option<usize>, String)>) -> Vec<String> {
    // None sorts before Some, so the scalar form comes first
    patterns.sort_by_key(|(position, _)| *position);
    patterns.into_iter().map(|(_, pattern)| pattern).collect()
}
