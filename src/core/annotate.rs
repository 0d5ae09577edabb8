//! Merge resolved skip decisions into pipeline steps

use crate::core::{
    conditions::ConditionSet,
    diagnostics::{Diagnostic, Diagnostics},
    pipeline::PipelineDocument,
};
use crate::error::PipelineError;
use serde_yaml::{Mapping, Value};

/// How a step is identified for condition lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIdentity<'a> {
    /// `wait` and other structural markers, passed through untouched
    Marker,
    /// `label`, or `block` when there is no label
    Named(&'a str),
    /// A mapping step with nothing to identify it by
    Missing,
}

/// Work out how a step is identified
pub fn step_identity(step: &Value) -> StepIdentity<'_> {
    match step {
        Value::Mapping(map) => mapping_identity(map),
        _ => StepIdentity::Marker,
    }
}

fn mapping_identity(map: &Mapping) -> StepIdentity<'_> {
    let named = map
        .get("label")
        .and_then(Value::as_str)
        .or_else(|| map.get("block").and_then(Value::as_str));

    match named {
        Some(name) => StepIdentity::Named(name),
        None if map.contains_key("wait") => StepIdentity::Marker,
        None => StepIdentity::Missing,
    }
}

/// Set `skip` on every identified step of `pipeline`.
///
/// Step order and all other fields are preserved. A step that already has a
/// `skip` key keeps it. Steps whose label has no condition run.
pub fn annotate(
    pipeline: PipelineDocument,
    conditions: &ConditionSet,
    diagnostics: &mut Diagnostics,
) -> Result<PipelineDocument, PipelineError> {
    let PipelineDocument { steps, extra } = pipeline;

    let steps = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| annotate_step(index, step, conditions, diagnostics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PipelineDocument { steps, extra })
}

fn annotate_step(
    index: usize,
    mut step: Value,
    conditions: &ConditionSet,
    diagnostics: &mut Diagnostics,
) -> Result<Value, PipelineError> {
    if let Value::Mapping(map) = &mut step {
        apply_condition(index, map, conditions, diagnostics)?;
    }
    Ok(step)
}

fn apply_condition(
    index: usize,
    map: &mut Mapping,
    conditions: &ConditionSet,
    diagnostics: &mut Diagnostics,
) -> Result<(), PipelineError> {
    let label = match mapping_identity(map) {
        StepIdentity::Marker => return Ok(()),
        StepIdentity::Missing => return Err(PipelineError::MissingIdentifier { index }),
        StepIdentity::Named(label) => label.to_string(),
    };

    if map.contains_key("skip") {
        diagnostics.record(Diagnostic::SkipAlreadySet { label });
        return Ok(());
    }

    let skip = match conditions.get(&label) {
        Some(skip) => skip,
        None => {
            diagnostics.record(Diagnostic::NoCondition { label });
            false
        }
    };
    map.insert(Value::from("skip"), Value::Bool(skip));

    Ok(())
}

/// Check that every non-marker step can be identified.
///
/// Returns the number of steps that conditions can apply to.
pub fn check_identifiers(pipeline: &PipelineDocument) -> Result<usize, PipelineError> {
    let mut named = 0;
    for (index, step) in pipeline.steps.iter().enumerate() {
        match step_identity(step) {
            StepIdentity::Named(_) => named += 1,
            StepIdentity::Marker => {}
            StepIdentity::Missing => return Err(PipelineError::MissingIdentifier { index }),
        }
    }
    Ok(named)
}
