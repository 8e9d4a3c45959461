use serde_json::{Map, Value, json};

use crate::domain::{StepOutcome, Strategy, ToolCall};

/// Fold per-call outcomes into the strategy-shaped final value.
///
/// Terminal strategies surface the last value in topological order, and
/// only when everything succeeded. Grouped strategies always surface a
/// labeled collection so partial results stay visible to the caller.
pub(crate) fn final_value(
    strategy: Strategy,
    order: &[u32],
    calls: &[ToolCall],
    outcomes: &[StepOutcome],
) -> Option<Value> {
    if strategy.is_grouped() {
        return Some(Value::Object(labeled_outcomes(calls, outcomes)));
    }

    if !outcomes.iter().all(|outcome| outcome.success) {
        return None;
    }
    let terminal = *order.last()?;
    outcomes
        .iter()
        .find(|outcome| outcome.step == terminal)
        .and_then(|outcome| outcome.value.clone())
}

fn labeled_outcomes(calls: &[ToolCall], outcomes: &[StepOutcome]) -> Map<String, Value> {
    let mut labeled = Map::new();
    for outcome in outcomes {
        let label = label_for(calls, outcome, &labeled);
        let value = match (&outcome.value, &outcome.error) {
            (Some(value), _) => value.clone(),
            (None, Some(error)) => json!({
                "error": {"kind": error.kind(), "message": error.to_string()}
            }),
            (None, None) => Value::Null,
        };
        labeled.insert(label, value);
    }
    labeled
}

/// Result variable if declared, else tool name; the step number breaks the
/// tie when two calls would otherwise share a label.
fn label_for(calls: &[ToolCall], outcome: &StepOutcome, taken: &Map<String, Value>) -> String {
    let base = calls
        .iter()
        .find(|call| call.step == outcome.step)
        .and_then(|call| call.result_variable.clone())
        .unwrap_or_else(|| outcome.tool_name.clone());
    if taken.contains_key(&base) {
        format!("{base}#{step}", step = outcome.step)
    } else {
        base
    }
}
