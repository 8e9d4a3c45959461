use std::collections::{HashMap, HashSet};

use super::errors::PlanError;
use super::graph::DependencyGraph;
use crate::domain::{ExecutionPlan, Strategy};

/// Pre-flight plan validation. Returns the dependency graph so the
/// coordinator does not rebuild it. Nothing may execute when this fails.
pub(crate) fn validate(plan: &ExecutionPlan) -> Result<DependencyGraph, PlanError> {
    if plan.calls.is_empty() {
        return Err(PlanError::Empty);
    }

    let mut seen_steps = HashSet::new();
    let mut seen_variables: HashMap<&str, u32> = HashMap::new();
    for call in &plan.calls {
        if call.step == 0 {
            return Err(PlanError::ZeroStep);
        }
        if !seen_steps.insert(call.step) {
            return Err(PlanError::DuplicateStep(call.step));
        }
        if let Some(variable) = call.result_variable.as_deref() {
            if let Some(&first) = seen_variables.get(variable) {
                return Err(PlanError::DuplicateResultVariable {
                    variable: variable.to_string(),
                    first,
                    second: call.step,
                });
            }
            seen_variables.insert(variable, call.step);
        }
    }

    match plan.strategy {
        Strategy::Single if plan.calls.len() != 1 => {
            return Err(PlanError::SingleCardinality(plan.calls.len()));
        }
        Strategy::Parallel => {
            if let Some(call) = plan.calls.iter().find(|call| {
                !call.dependency.steps().is_empty() || call.references().next().is_some()
            }) {
                return Err(PlanError::ParallelDependency(call.step));
            }
        }
        _ => {}
    }

    DependencyGraph::build(plan)
}
